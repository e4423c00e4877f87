//! Enums command: list the enum types a dump would produce.

use crate::convert::{ConvertOptions, EnumCatalog};
use crate::source;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct EnumReport<'a> {
    file: String,
    count: usize,
    types: &'a [crate::convert::EnumDefinition],
}

pub fn run(file: PathBuf, config: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let options = ConvertOptions::load_or_default(config.as_deref())?;
    let content = source::read_dump(&file, false)?;
    let catalog = EnumCatalog::extract(&content, &options.enum_type_prefix);

    if json {
        let report = EnumReport {
            file: file.display().to_string(),
            count: catalog.len(),
            types: catalog.definitions(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No enum types found in {}", file.display());
        return Ok(());
    }

    let width = catalog
        .definitions()
        .iter()
        .map(|d| d.type_name.len())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());

    println!("{:<width$}  VALUES", "TYPE", width = width);
    for def in catalog.definitions() {
        let values: Vec<String> = def
            .values
            .iter()
            .map(|v| format!("'{}'", v.replace('\'', "''")))
            .collect();
        println!("{:<width$}  {}", def.type_name, values.join(", "), width = width);
    }
    println!();
    println!("{} enum type(s)", catalog.len());

    Ok(())
}
