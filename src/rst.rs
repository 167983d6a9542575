//! Rendering of parsed files to reStructuredText.
//!
//! Each declaration gets a `.. _proto-NAME:` label, a `code-block:: protobuf`
//! listing and a detail list for its elements. Description text arrives from
//! the parser already normalized, with cross-references resolved against the
//! same `proto-` labels emitted here.

use crate::ast::{Enum, Message, ParsedFile, Service};

/// Renders one file's documentation as an RST fragment.
pub fn render_file(file: &ParsedFile) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !file.file_comment.is_empty() {
        lines.push(file.file_comment.clone());
        lines.push(String::new());
    }

    if !file.package.is_empty() {
        lines.push(format!("**Package:** ``{}``", file.package));
        lines.push(String::new());
    }

    if !file.messages.is_empty() {
        lines.push("Messages".to_owned());
        lines.push("~~~~~~~~".to_owned());
        lines.push(String::new());
        for message in &file.messages {
            render_message(message, &mut lines);
        }
    }

    if !file.enums.is_empty() {
        lines.push("Enumerations".to_owned());
        lines.push("~~~~~~~~~~~~".to_owned());
        lines.push(String::new());
        for enumeration in &file.enums {
            render_enum(enumeration, &mut lines);
        }
    }

    if !file.services.is_empty() {
        lines.push("Services".to_owned());
        lines.push("~~~~~~~~".to_owned());
        lines.push(String::new());
        for service in &file.services {
            render_service(service, &mut lines);
        }
    }

    lines.join("\n")
}

fn render_message(message: &Message, lines: &mut Vec<String>) {
    lines.push(format!(".. _proto-{}:", message.name));
    lines.push(String::new());
    lines.push(format!("**{}**", message.name));
    lines.push(String::new());

    if !message.comment.is_empty() {
        lines.push(message.comment.clone());
        lines.push(String::new());
    }

    lines.push(".. code-block:: protobuf".to_owned());
    lines.push(String::new());
    lines.push(format!("   message {} {{", message.name));
    for field in &message.fields {
        let label = field.label.as_str();
        let prefix = if label.is_empty() {
            String::new()
        } else {
            format!("{label} ")
        };
        lines.push(format!(
            "      {prefix}{} {} = {};",
            field.ty, field.name, field.number
        ));
    }
    lines.push("   }".to_owned());
    lines.push(String::new());

    let has_details = message
        .fields
        .iter()
        .any(|field| !field.comment.is_empty() || !field.keywords.is_empty());
    if has_details {
        lines.push("**Fields:**".to_owned());
        lines.push(String::new());
        for field in &message.fields {
            let mut detail = format!("- ``{}`` ({})", field.name, field.ty);
            if !field.comment.is_empty() {
                detail.push_str(": ");
                detail.push_str(&field.comment);
            }
            lines.push(detail);
            for (annotation, value) in &field.keywords {
                lines.push(format!("  - *{annotation}*: ``{value}``"));
            }
        }
        lines.push(String::new());
    }
}

fn render_enum(enumeration: &Enum, lines: &mut Vec<String>) {
    lines.push(format!(".. _proto-{}:", enumeration.name));
    lines.push(String::new());
    lines.push(format!("**{}**", enumeration.name));
    lines.push(String::new());

    if !enumeration.comment.is_empty() {
        lines.push(enumeration.comment.clone());
        lines.push(String::new());
    }

    lines.push(".. code-block:: protobuf".to_owned());
    lines.push(String::new());
    lines.push(format!("   enum {} {{", enumeration.name));
    for value in &enumeration.values {
        lines.push(format!("      {} = {};", value.name, value.number));
    }
    lines.push("   }".to_owned());
    lines.push(String::new());

    if enumeration.values.iter().any(|value| !value.comment.is_empty()) {
        lines.push("**Values:**".to_owned());
        lines.push(String::new());
        for value in &enumeration.values {
            let mut detail = format!("- ``{}``", value.name);
            if !value.comment.is_empty() {
                detail.push_str(": ");
                detail.push_str(&value.comment);
            }
            lines.push(detail);
        }
        lines.push(String::new());
    }
}

fn render_service(service: &Service, lines: &mut Vec<String>) {
    lines.push(format!(".. _proto-{}:", service.name));
    lines.push(String::new());
    lines.push(format!("**{}**", service.name));
    lines.push(String::new());

    if !service.comment.is_empty() {
        lines.push(service.comment.clone());
        lines.push(String::new());
    }

    lines.push(".. code-block:: protobuf".to_owned());
    lines.push(String::new());
    lines.push(format!("   service {} {{", service.name));
    for method in &service.methods {
        lines.push(format!(
            "      rpc {}({}) returns ({});",
            method.name, method.request_type, method.response_type
        ));
    }
    lines.push("   }".to_owned());
    lines.push(String::new());

    if service.methods.iter().any(|method| !method.comment.is_empty()) {
        lines.push("**Methods:**".to_owned());
        lines.push(String::new());
        for method in &service.methods {
            lines.push(format!("- ``{}``", method.name));
            if !method.comment.is_empty() {
                lines.push(format!("  {}", method.comment));
            }
            lines.push(format!("  Request: ``{}``", method.request_type));
            lines.push(format!("  Response: ``{}``", method.response_type));
            lines.push(String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use crate::ast::{Field, FieldLabel, Message, ParsedFile, RpcMethod, Service};
    use crate::Annotation;

    use super::render_file;

    #[test]
    fn renders_message_with_field_details() {
        let file = ParsedFile::builder()
            .package("user.v1".to_owned())
            .message(
                Message::builder("User")
                    .comment("A user account.".to_owned())
                    .field(
                        Field::builder("id", "string")
                            .number(1)
                            .comment("Unique id.".to_owned())
                            .keyword(Annotation::MinLength, "1")
                            .build(),
                    )
                    .field(
                        Field::builder("roles", "Role")
                            .label(FieldLabel::Repeated)
                            .number(2)
                            .build(),
                    )
                    .build(),
            )
            .build();

        let expected = "\
**Package:** ``user.v1``

Messages
~~~~~~~~

.. _proto-User:

**User**

A user account.

.. code-block:: protobuf

   message User {
      string id = 1;
      repeated Role roles = 2;
   }

**Fields:**

- ``id`` (string): Unique id.
  - *minLength*: ``1``
- ``roles`` (Role)
";
        assert_eq!(render_file(&file), expected);
    }

    #[test]
    fn renders_service_methods() {
        let file = ParsedFile::builder()
            .service(
                Service::builder("UserService")
                    .comment("Manages users.".to_owned())
                    .method(RpcMethod::new(
                        "GetUser",
                        "GetUserRequest",
                        "GetUserResponse",
                        "Fetches a user.".to_owned(),
                    ))
                    .build(),
            )
            .build();

        let expected = "\
Services
~~~~~~~~

.. _proto-UserService:

**UserService**

Manages users.

.. code-block:: protobuf

   service UserService {
      rpc GetUser(GetUserRequest) returns (GetUserResponse);
   }

**Methods:**

- ``GetUser``
  Fetches a user.
  Request: ``GetUserRequest``
  Response: ``GetUserResponse``
";
        assert_eq!(render_file(&file), expected);
    }

    #[test]
    fn empty_file_renders_empty() {
        assert_eq!(render_file(&ParsedFile::default()), "");
    }

    #[test]
    fn plain_fields_skip_detail_list() {
        let file = ParsedFile::builder()
            .message(
                Message::builder("Bare")
                    .field(Field::builder("x", "int32").number(1).build())
                    .build(),
            )
            .build();

        let rendered = render_file(&file);
        assert!(rendered.contains("   message Bare {"));
        assert!(!rendered.contains("**Fields:**"));
    }
}
