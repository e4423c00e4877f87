//! Conversion tests through the public library API.

use mysql2pg::convert::{
    rewrite_line, ConvertOptions, ConvertWarning, Converter, EnumCatalog, SchemaCatalog,
    TypeMapper, WarningCollector,
};

fn convert(dump: &str) -> String {
    let options = ConvertOptions {
        drop_tables: false,
        session_preamble: false,
        ..ConvertOptions::default()
    };
    Converter::new(options).convert(dump).text
}

#[test]
fn test_identifier_quotes_removed_outside_literals() {
    assert_eq!(
        rewrite_line("INSERT INTO `t` VALUES ('a `quoted` word');"),
        "INSERT INTO t VALUES ('a `quoted` word');"
    );
}

#[test]
fn test_escaped_quotes_doubled() {
    assert_eq!(
        rewrite_line(r"INSERT INTO t VALUES ('it\'s');"),
        "INSERT INTO t VALUES ('it''s');"
    );
}

#[test]
fn test_type_mapping_through_public_api() {
    assert_eq!(
        TypeMapper::mysql_to_postgres("id int(11) NOT NULL"),
        "id INTEGER NOT NULL"
    );
    assert_eq!(TypeMapper::mysql_to_postgres("b longblob"), "b BYTEA");
    assert_eq!(
        TypeMapper::mysql_to_postgres("flag tinyint(1)"),
        "flag BOOLEAN"
    );
}

#[test]
fn test_enum_catalog_is_stable_across_dumps() {
    let a = EnumCatalog::extract("CREATE TABLE a (\n  s enum('x','y')\n);", "enum_type_");
    let b = EnumCatalog::extract(
        "CREATE TABLE b (\n  other enum('x','y') NOT NULL\n);",
        "enum_type_",
    );
    assert_eq!(
        a.definitions()[0].type_name,
        b.definitions()[0].type_name,
        "Same values should give the same type name"
    );
}

#[test]
fn test_same_enum_declared_once() {
    let dump = "\
CREATE TABLE a (
  s enum('on','off')
);
CREATE TABLE b (
  t enum('on','off')
);
";
    let out = convert(dump);
    assert_eq!(out.matches("CREATE TYPE ").count(), 1, "got: {}", out);
    assert_eq!(out.matches("DROP TYPE IF EXISTS ").count(), 1);
}

#[test]
fn test_enum_types_declared_before_tables() {
    let out = convert("CREATE TABLE a (\n  s enum('on','off')\n);\n");
    let decl = out.find("CREATE TYPE ").unwrap();
    let table = out.find("CREATE TABLE a").unwrap();
    assert!(decl < table, "got: {}", out);
}

#[test]
fn test_schema_catalog_lookup_is_case_insensitive() {
    let lines: Vec<String> = ["CREATE TABLE Users (", "  Active BOOLEAN NOT NULL", ");"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let catalog = SchemaCatalog::build(&lines, &EnumCatalog::default());
    assert!(catalog.booleans.contains("users", "active"));
    assert!(catalog.booleans.contains("USERS", "ACTIVE"));
    assert!(!catalog.enums.has_table("users"));
}

#[test]
fn test_boolean_values_coerced_by_column_name() {
    let dump = "\
CREATE TABLE flags (
  id int(11) NOT NULL,
  on_sale tinyint(1) NOT NULL
);
INSERT INTO flags (on_sale, id) VALUES (1, 10), (0, 11);
";
    let out = convert(dump);
    assert!(
        out.contains("INSERT INTO flags (on_sale, id) VALUES (TRUE, 10), (FALSE, 11);"),
        "got: {}",
        out
    );
}

#[test]
fn test_boolean_value_inside_literal_untouched() {
    let dump = "\
CREATE TABLE flags (
  label varchar(10),
  on_sale tinyint(1)
);
INSERT INTO flags VALUES ('1, 0', 1);
";
    let out = convert(dump);
    assert!(
        out.contains("INSERT INTO flags VALUES ('1, 0', TRUE);"),
        "got: {}",
        out
    );
}

#[test]
fn test_empty_enum_value_becomes_null() {
    let dump = "\
CREATE TABLE posts (
  status enum('draft','') NOT NULL,
  title varchar(20)
);
INSERT INTO posts VALUES ('', ''),('draft', 'x');
";
    let out = convert(dump);
    assert!(
        out.contains("INSERT INTO posts VALUES (NULL, ''),('draft', 'x');"),
        "got: {}",
        out
    );
}

#[test]
fn test_literal_backslashes_survive_conversion() {
    let dump = r"CREATE TABLE `t` (
  `id` int(11) NOT NULL,
  `path` varchar(20),
  `flag` tinyint(1),
  `sep` enum('\\','/')
);
INSERT INTO `t` VALUES (1,'C:\\',1,'\\'),(2,'x',0,'/');
";
    let converted = Converter::new(ConvertOptions {
        drop_tables: false,
        session_preamble: false,
        ..ConvertOptions::default()
    })
    .convert(dump);
    let out = &converted.text;

    assert!(
        out.contains(r"INSERT INTO t VALUES (1,'C:\',TRUE,'\'),(2,'x',FALSE,'/');"),
        "got: {}",
        out
    );
    assert!(!out.to_lowercase().contains("enum("), "got: {}", out);
    assert_eq!(converted.stats.warnings_total, 0);
}

#[test]
fn test_key_and_index_columns_keep_insert_positions() {
    let dump = "\
CREATE TABLE `t` (
  `id` int(11) NOT NULL,
  `index` int(11) NOT NULL,
  `key` varchar(10),
  `flag` tinyint(1),
  KEY `idx_flag` (`flag`)
);
INSERT INTO `t` VALUES (1,0,'k',1);
";
    let out = convert(dump);
    assert!(out.contains("  index INTEGER NOT NULL,"), "got: {}", out);
    assert!(
        out.contains("INSERT INTO t VALUES (1,0,'k',TRUE);"),
        "got: {}",
        out
    );
}

#[test]
fn test_insert_for_unknown_table_unchanged() {
    let dump = "INSERT INTO ghosts VALUES (1, '');\n";
    assert_eq!(convert(dump), dump);
}

#[test]
fn test_dangling_comma_repaired() {
    let dump = "\
CREATE TABLE t (
  id int(11) NOT NULL,
  KEY idx_id (id)
);
";
    let out = convert(dump);
    assert!(
        out.contains("  id INTEGER NOT NULL\n--   KEY idx_id (id)\n);"),
        "got: {}",
        out
    );
}

#[test]
fn test_secondary_indexes_kept_when_disabled() {
    let options = ConvertOptions {
        comment_secondary_indexes: false,
        ..ConvertOptions::default()
    };
    let out = Converter::new(options)
        .convert("CREATE TABLE t (\n  id int(11) NOT NULL,\n  KEY idx_id (id)\n);")
        .text;
    assert!(!out.contains("--   KEY"), "got: {}", out);
}

#[test]
fn test_unbalanced_tuple_reported() {
    let dump = "\
CREATE TABLE t (
  flag tinyint(1)
);
INSERT INTO t VALUES (1),(0;
";
    let converted = Converter::default().convert(dump);
    assert_eq!(converted.stats.warnings_total, 1);
    assert!(matches!(
        converted.warnings.warnings()[0],
        ConvertWarning::StructuralParse { line: 4, .. }
    ));
    assert!(
        converted.text.contains("INSERT INTO t VALUES (TRUE),(0;"),
        "got: {}",
        converted.text
    );
}

#[test]
fn test_warning_collector_counts_beyond_limit() {
    let mut collector = WarningCollector::with_limit(2);
    for line in 1..=5 {
        collector.add(ConvertWarning::unrecognized(line, "ENGINE =", "x ENGINE = Aria"));
    }
    assert_eq!(collector.count(), 2);
    assert_eq!(collector.total(), 5);
}

#[test]
fn test_empty_dump() {
    let converted = Converter::default().convert("");
    assert_eq!(converted.stats.lines_read, 0);
    assert!(converted
        .text
        .starts_with("-- Preamble for PostgreSQL import\n"));
}

#[test]
fn test_crlf_input() {
    let out = convert("CREATE TABLE `t` (\r\n  `id` int(11)\r\n);\r\n");
    assert_eq!(out, "CREATE TABLE t (\n  id INTEGER\n);\n");
}

#[test]
fn test_conversion_is_idempotent_on_output_schema() {
    let once = convert("CREATE TABLE t (\n  id int(11) NOT NULL,\n  flag tinyint(1)\n);\n");
    let twice = convert(&once);
    assert_eq!(once, twice);
}
