//! Implementation of the `crab list` command.

use console::{Alignment, pad_str};

use crab_adapters::LocalTemplateStore;
use crab_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let templates_dir = global.templates_dir.or(config.templates_dir);
    let store = LocalTemplateStore::discover(templates_dir.as_deref());
    let service = TemplateService::new(Box::new(store));

    let templates = service.list()?;

    match args.format {
        ListFormat::Table => {
            if templates.is_empty() {
                output.warning(&format!(
                    "No templates found in {}",
                    service.root().display()
                ))?;
                return Ok(());
            }
            output.header("Available Templates:")?;
            output.data(&render_table(&templates))?;
        }
        ListFormat::List => {
            for t in &templates {
                output.data(&t.name)?;
            }
        }
        // JSON goes through `data` so it stays parseable under `--quiet`.
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&templates).map_err(|e| {
                CliError::InvalidInput {
                    message: format!("Failed to serialize templates: {e}"),
                }
            })?;
            output.data(&json)?;
        }
    }

    Ok(())
}

fn render_table(templates: &[TemplateInfo]) -> String {
    let width = templates
        .iter()
        .map(|t| t.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "  {}  {:>5}  PATH",
        pad_str("NAME", width, Alignment::Left, None),
        "FILES"
    )];
    lines.extend(templates.iter().map(|t| {
        format!(
            "  {}  {:>5}  {}",
            pad_str(&t.name, width, Alignment::Left, None),
            t.files,
            t.path
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, files: usize) -> TemplateInfo {
        TemplateInfo {
            name: name.into(),
            files,
            path: format!("/templates/{name}"),
        }
    }

    #[test]
    fn table_aligns_names() {
        let table = render_table(&[info("basic", 7), info("data-science", 12)]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  NAME"));
        assert!(lines[1].contains("basic"));
        assert!(lines[1].ends_with("/templates/basic"));
        let path_col = lines[1].find("/templates").unwrap();
        assert_eq!(path_col, lines[2].find("/templates").unwrap());
    }

    #[test]
    fn json_lists_every_field() {
        let json = serde_json::to_value([info("basic", 7)]).unwrap();
        assert_eq!(json[0]["name"], "basic");
        assert_eq!(json[0]["files"], 7);
        assert_eq!(json[0]["path"], "/templates/basic");
    }
}
