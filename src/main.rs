use std::{fs, path::PathBuf};

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use protodoc::diagram::{DependencyFormat, DiagramGenerator};
use protodoc::rst;

#[derive(Debug, Parser)]
#[command(name = "protodoc", version, about = "Generate documentation from Protocol Buffer source files")]
pub struct Args {
    /// The proto source file(s) to document.
    #[arg(value_name = "PROTO_FILES", required = true)]
    files: Vec<PathBuf>,
    /// Only document files whose package matches exactly.
    #[arg(short, long, value_name = "PACKAGE")]
    package: Option<String>,
    /// The output path to write to, instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
    /// Emit a diagram instead of documentation.
    #[arg(long, value_enum, value_name = "KIND")]
    diagram: Option<DiagramKind>,
    /// An optional title for the emitted diagram.
    #[arg(long, value_name = "TITLE", requires = "diagram")]
    title: Option<String>,
    /// Emit the dependency diagram as PlantUML instead of Graphviz.
    #[arg(long, requires = "diagram")]
    plantuml: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiagramKind {
    /// Class diagram of messages and enums.
    Class,
    /// Component diagram of services.
    Service,
    /// Package dependency graph.
    Dependencies,
}

pub fn main() -> Result<()> {
    miette::set_panic_hook();

    let args = Args::parse();

    let mut files = Vec::new();
    for path in &args.files {
        let file = protodoc::parse_file(path)?;
        if let Some(package) = &args.package {
            if &file.package != package {
                continue;
            }
        }
        files.push(file);
    }

    let output = match args.diagram {
        Some(kind) => {
            let mut generator = DiagramGenerator::new();
            for file in files {
                generator.add_file(file);
            }
            let title = args.title.as_deref();
            match kind {
                DiagramKind::Class => generator.class_diagram(None, title),
                DiagramKind::Service => generator.service_diagram(None, title),
                DiagramKind::Dependencies => {
                    let format = if args.plantuml {
                        DependencyFormat::PlantUml
                    } else {
                        DependencyFormat::Graphviz
                    };
                    generator.dependency_graph(title, format)
                }
            }
        }
        None => {
            let fragments: Vec<String> = files.iter().map(rst::render_file).collect();
            fragments.join("\n")
        }
    };

    match args.output {
        Some(path) => fs::write(path, output).into_diagnostic()?,
        None => println!("{output}"),
    }
    Ok(())
}
