//! Subcommand implementations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, FixedOffset, Local};
use idfgen::{BuildingSpecification, BuildingType, GenerationResult, Generator, TemplateCatalog};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

/// Shared state for one CLI invocation.
pub struct Context {
    pub catalog: TemplateCatalog,
    pub output_dir: PathBuf,
    pub default_building_type: Option<BuildingType>,
}

impl Context {
    fn read_spec(&self, path: &Path) -> Result<BuildingSpecification> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading specification {}", path.display()))?;
        let mut spec = BuildingSpecification::from_json(&json)
            .with_context(|| format!("parsing specification {}", path.display()))?;
        if spec.building_type.is_none() {
            spec.building_type = self.default_building_type;
        }
        Ok(spec)
    }
}

/// JSON view of a finished generation.
#[derive(Serialize)]
struct Report<'a> {
    output_path: &'a Path,
    #[serde(flatten)]
    result: &'a GenerationResult,
}

pub fn list(ctx: &Context, building_type: Option<&str>) -> Result<()> {
    let templates = ctx.catalog.list(building_type);
    if templates.is_empty() {
        println!("No templates found in {}", ctx.catalog.root().display());
        return Ok(());
    }

    println!("{:<28} {:<15} {:<14} NAME", "ID", "TYPE", "HVAC");
    for t in templates {
        println!(
            "{:<28} {:<15} {:<14} {}",
            t.template_id, t.building_type, t.hvac_system, t.name
        );
    }
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&template_details(ctx, id)?)?);
    Ok(())
}

/// The template's metadata file as written, plus the resolved document path.
fn template_details(ctx: &Context, id: &str) -> Result<serde_json::Value> {
    let template = ctx.catalog.require(id)?;
    let mut details = template.read_metadata()?;
    if let Some(fields) = details.as_object_mut() {
        fields.insert(
            "document_path".to_string(),
            template.document_path.display().to_string().into(),
        );
    }
    Ok(details)
}

pub fn generate(
    ctx: &Context,
    spec_path: &Path,
    template: Option<&str>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let spec = ctx.read_spec(spec_path)?;
    let result = Generator::new(&ctx.catalog)
        .generate(&spec, template)
        .with_context(|| format!("generating model for {}", spec_path.display()))?;

    let path = output
        .unwrap_or_else(|| ctx.output_dir.join(output_file_name(&spec, &result.timestamp)));
    result.write_to(&path)?;

    if json {
        let report = Report {
            output_path: &path,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&path, &result);
    }
    Ok(())
}

pub fn batch(ctx: &Context, specs: &[PathBuf], template: Option<&str>) -> Result<()> {
    let timestamp = Local::now().fixed_offset();
    let generator = Generator::new(&ctx.catalog);

    let loaded: Vec<_> = specs
        .iter()
        .map(|path| (path, ctx.read_spec(path)))
        .collect();
    let names = unique_names(loaded.iter().map(|(_, spec)| match spec {
        Ok(spec) => output_file_name(spec, &timestamp),
        Err(_) => String::new(),
    }));

    let outcomes: Vec<(&PathBuf, Result<PathBuf>)> = loaded
        .into_par_iter()
        .zip(names.into_par_iter())
        .map(|((spec_path, spec), name)| {
            let outcome = spec.and_then(|spec| {
                let result = generator.generate_at(&spec, template, timestamp)?;
                let path = ctx.output_dir.join(name);
                result.write_to(&path)?;
                Ok(path)
            });
            (spec_path, outcome)
        })
        .collect();

    let mut failed = 0;
    for (spec_path, outcome) in &outcomes {
        match outcome {
            Ok(path) => println!("{} -> {}", spec_path.display(), path.display()),
            Err(e) => {
                failed += 1;
                error!(spec = %spec_path.display(), error = %format!("{e:#}"), "generation failed");
                println!("{} failed: {e:#}", spec_path.display());
            }
        }
    }
    info!(total = outcomes.len(), failed, "batch finished");

    if failed > 0 {
        bail!("{failed} of {} specifications failed", outcomes.len());
    }
    Ok(())
}

fn print_summary(path: &Path, result: &GenerationResult) {
    println!(
        "Generated {} from template {}",
        path.display(),
        result.template_used
    );
    for m in &result.modifications {
        println!("  + {m}");
    }
    for s in &result.skipped {
        println!("  - {s}");
    }
}

/// Project name reduced to characters safe in a file name.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<project>_<YYYYmmdd_HHMMSS>.idf`, with `model` for unnamed projects.
pub fn output_file_name(spec: &BuildingSpecification, timestamp: &DateTime<FixedOffset>) -> String {
    let project = spec
        .project_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("model");
    format!(
        "{}_{}.idf",
        safe_name(project),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Suffix repeated names with `_2`, `_3`, ... before the extension.
fn unique_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            match name.strip_suffix(".idf") {
                Some(stem) => format!("{stem}_{count}.idf"),
                None => format!("{name}_{count}"),
            }
        })
        .collect()
}
