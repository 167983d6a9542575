//! Diagram generation from parsed protobuf structures.
//!
//! Produces PlantUML class and service diagrams and a package dependency
//! graph from the same model the documentation renderer consumes. A field
//! type counts as a message reference when it is neither one of the fixed
//! protobuf scalars nor a `map<...>` literal; dotted references additionally
//! contribute package dependency edges.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Enum, FieldLabel, Message, ParsedFile, Service};

const SCALAR_TYPES: &[&str] = &[
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
];

fn is_message_type(ty: &str) -> bool {
    !SCALAR_TYPES.contains(&ty) && !ty.starts_with("map<")
}

/// The package a dotted type reference lives in, if it has one.
fn package_of(ty: &str) -> Option<&str> {
    ty.rsplit_once('.').map(|(package, _)| package)
}

/// Output format for [`DiagramGenerator::dependency_graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyFormat {
    /// Graphviz DOT.
    Graphviz,
    /// PlantUML.
    PlantUml,
}

/// Generates diagrams over a set of parsed files.
#[derive(Debug, Default)]
pub struct DiagramGenerator {
    files: Vec<ParsedFile>,
}

impl DiagramGenerator {
    /// Creates an empty generator.
    pub fn new() -> Self {
        DiagramGenerator::default()
    }

    /// Adds a parsed file to the diagram set.
    pub fn add_file(&mut self, file: ParsedFile) {
        self.files.push(file);
    }

    fn filtered(&self, package_filter: Option<&str>) -> impl Iterator<Item = &ParsedFile> + '_ {
        let filter = package_filter.map(str::to_owned);
        self.files.iter().filter(move |file| match &filter {
            Some(package) => &file.package == package,
            None => true,
        })
    }

    /// A PlantUML class diagram of messages and enums, grouped by package.
    pub fn class_diagram(&self, package_filter: Option<&str>, title: Option<&str>) -> String {
        let mut lines: Vec<String> = vec!["@startuml".to_owned()];

        if let Some(title) = title {
            lines.push(format!("title {title}"));
            lines.push(String::new());
        }

        let mut packages: BTreeMap<&str, (Vec<&Enum>, Vec<&Message>)> = BTreeMap::new();
        for file in self.filtered(package_filter) {
            let entry = packages.entry(file.package.as_str()).or_default();
            entry.0.extend(file.enums.iter());
            entry.1.extend(file.messages.iter());
        }

        for (package, (enums, messages)) in &packages {
            if !package.is_empty() {
                lines.push(format!("package \"{package}\" {{"));
                lines.push(String::new());
            }
            for enumeration in enums {
                render_enum_class(enumeration, &mut lines);
            }
            for message in messages {
                render_message_class(message, &mut lines);
            }
            if !package.is_empty() {
                lines.push("}".to_owned());
                lines.push(String::new());
            }
        }

        lines.push(String::new());
        lines.push("' Relationships".to_owned());
        for file in self.filtered(package_filter) {
            for message in &file.messages {
                render_relationships(message, &mut lines);
            }
        }

        lines.push("@enduml".to_owned());
        lines.join("\n")
    }

    /// A PlantUML component diagram of services and their RPC methods.
    pub fn service_diagram(&self, package_filter: Option<&str>, title: Option<&str>) -> String {
        let mut lines: Vec<String> = vec!["@startuml".to_owned()];

        if let Some(title) = title {
            lines.push(format!("title {title}"));
            lines.push(String::new());
        }

        lines.push("' Service components".to_owned());
        lines.push(String::new());

        for file in self.filtered(package_filter) {
            for service in &file.services {
                render_service_component(service, &file.package, &mut lines);
            }
        }

        lines.push("@enduml".to_owned());
        lines.join("\n")
    }

    /// A dependency graph of packages, with edges derived from dotted field
    /// type references.
    pub fn dependency_graph(&self, title: Option<&str>, format: DependencyFormat) -> String {
        let mut packages: BTreeSet<&str> = BTreeSet::new();
        let mut dependencies: BTreeSet<(&str, &str)> = BTreeSet::new();

        for file in &self.files {
            if file.package.is_empty() {
                continue;
            }
            packages.insert(&file.package);
            for message in &file.messages {
                for field in &message.fields {
                    if let Some(dependency) = package_of(&field.ty) {
                        if dependency != file.package {
                            dependencies.insert((&file.package, dependency));
                        }
                    }
                }
            }
        }

        match format {
            DependencyFormat::Graphviz => graphviz_graph(title, &packages, &dependencies),
            DependencyFormat::PlantUml => plantuml_graph(title, &packages, &dependencies),
        }
    }
}

fn render_message_class(message: &Message, lines: &mut Vec<String>) {
    lines.push(format!("class {} {{", message.name));
    for field in &message.fields {
        if field.label == FieldLabel::Repeated {
            lines.push(format!("    +{}[] {}", field.ty, field.name));
        } else {
            lines.push(format!("    +{} {}", field.ty, field.name));
        }
    }
    lines.push("}".to_owned());
    lines.push(String::new());
}

fn render_enum_class(enumeration: &Enum, lines: &mut Vec<String>) {
    lines.push(format!("enum {} {{", enumeration.name));
    for value in &enumeration.values {
        lines.push(format!("    {}", value.name));
    }
    lines.push("}".to_owned());
    lines.push(String::new());
}

fn render_relationships(message: &Message, lines: &mut Vec<String>) {
    for field in &message.fields {
        if is_message_type(&field.ty) {
            if field.label == FieldLabel::Repeated {
                lines.push(format!("{} \"1\" *-- \"*\" {}", message.name, field.ty));
            } else {
                lines.push(format!("{} \"1\" *-- \"1\" {}", message.name, field.ty));
            }
        }
    }
}

fn render_service_component(service: &Service, package: &str, lines: &mut Vec<String>) {
    if !package.is_empty() {
        lines.push(format!("package \"{package}\" {{"));
    }
    lines.push(format!("interface {} {{", service.name));
    for method in &service.methods {
        lines.push(format!(
            "    +{}({}): {}",
            method.name, method.request_type, method.response_type
        ));
    }
    lines.push("}".to_owned());
    if !package.is_empty() {
        lines.push("}".to_owned());
    }
    lines.push(String::new());
}

fn graphviz_graph(
    title: Option<&str>,
    packages: &BTreeSet<&str>,
    dependencies: &BTreeSet<(&str, &str)>,
) -> String {
    let mut lines: Vec<String> = vec![
        "digraph ProtobufDependencies {".to_owned(),
        "    rankdir=LR;".to_owned(),
        "    node [shape=box, style=filled, fillcolor=lightblue];".to_owned(),
        String::new(),
    ];

    if let Some(title) = title {
        lines.push(format!("    label=\"{title}\";"));
        lines.push("    labelloc=t;".to_owned());
        lines.push(String::new());
    }

    for package in packages {
        let node = package.replace('.', "_");
        lines.push(format!("    {node} [label=\"{package}\"];"));
    }

    lines.push(String::new());

    for (source, target) in dependencies {
        let source = source.replace('.', "_");
        let target = target.replace('.', "_");
        lines.push(format!("    {source} -> {target};"));
    }

    lines.push("}".to_owned());
    lines.join("\n")
}

fn plantuml_graph(
    title: Option<&str>,
    packages: &BTreeSet<&str>,
    dependencies: &BTreeSet<(&str, &str)>,
) -> String {
    let mut lines: Vec<String> = vec!["@startuml".to_owned()];

    if let Some(title) = title {
        lines.push(format!("title {title}"));
        lines.push(String::new());
    }

    for package in packages {
        lines.push(format!("package \"{package}\" {{"));
        lines.push("}".to_owned());
    }

    lines.push(String::new());

    for (source, target) in dependencies {
        lines.push(format!("\"{source}\" --> \"{target}\""));
    }

    lines.push("@enduml".to_owned());
    lines.join("\n")
}
