//! The document model recovered from a proto source file.
//!
//! Every record is a plain value: the parser builds each one through its
//! builder, finalizes it exactly once, and never touches it again. Records
//! carry no source spans or shared state, so files can be parsed and their
//! models consumed concurrently without coordination.

use std::collections::BTreeMap;

use crate::annotations::Annotation;

/// The parsed model of one `.proto` source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    /// File-level comment text found before the `package` statement.
    pub file_comment: String,
    /// The declared syntax (`"proto2"`, `"proto3"`), or empty if absent.
    pub syntax: String,
    /// The dotted package name, or empty if absent.
    pub package: String,
    /// Top-level message declarations, in source order.
    pub messages: Vec<Message>,
    /// Enum declarations, in source order.
    pub enums: Vec<Enum>,
    /// Service declarations, in source order.
    pub services: Vec<Service>,
}

/// A `message` declaration.
///
/// Only top-level message blocks are modeled; an inner message declaration
/// stays part of its parent's body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// The bare message identifier.
    pub name: String,
    /// Documentation attached to the declaration, cross-references resolved.
    pub comment: String,
    /// Field declarations found in the message body.
    pub fields: Vec<Field>,
}

/// A field declaration inside a message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// The field identifier.
    pub name: String,
    /// The declared type: a scalar, a dotted message/enum reference, or a
    /// `map<K, V>` literal.
    pub ty: String,
    /// The field label, if any.
    pub label: FieldLabel,
    /// The field number, exactly as written.
    pub number: u32,
    /// Description text with annotation lines removed.
    pub comment: String,
    /// Validation annotations lifted from the comment.
    pub keywords: BTreeMap<Annotation, String>,
}

/// A field's cardinality label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldLabel {
    /// No label.
    #[default]
    None,
    /// `optional`
    Optional,
    /// `repeated`
    Repeated,
}

impl FieldLabel {
    /// The label keyword as written in source, empty for [`FieldLabel::None`].
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldLabel::None => "",
            FieldLabel::Optional => "optional",
            FieldLabel::Repeated => "repeated",
        }
    }
}

/// An `enum` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    /// The bare enum identifier.
    pub name: String,
    /// Documentation attached to the declaration, cross-references resolved.
    pub comment: String,
    /// Value declarations found in the enum body.
    pub values: Vec<EnumValue>,
}

/// A value declaration inside an enum body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValue {
    /// The value identifier.
    pub name: String,
    /// The value number, exactly as written.
    pub number: u32,
    /// Documentation attached to the value, cross-references resolved.
    pub comment: String,
}

/// A `service` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    /// The bare service identifier.
    pub name: String,
    /// Documentation attached to the declaration, cross-references resolved.
    pub comment: String,
    /// RPC method declarations found in the service body.
    pub methods: Vec<RpcMethod>,
}

/// An `rpc` method declaration inside a service body.
///
/// Streaming qualifiers are not modeled; a `stream` marker in the source is
/// accepted and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcMethod {
    /// The method identifier.
    pub name: String,
    /// The parenthesized request type.
    pub request_type: String,
    /// The parenthesized response type.
    pub response_type: String,
    /// Documentation attached to the method, cross-references resolved.
    pub comment: String,
}

impl ParsedFile {
    /// Starts building a file model.
    pub fn builder() -> ParsedFileBuilder {
        ParsedFileBuilder {
            inner: ParsedFile::default(),
        }
    }
}

/// One-shot builder for [`ParsedFile`].
#[derive(Debug)]
pub struct ParsedFileBuilder {
    inner: ParsedFile,
}

impl ParsedFileBuilder {
    /// Sets the file-level comment.
    pub fn file_comment(mut self, file_comment: String) -> Self {
        self.inner.file_comment = file_comment;
        self
    }

    /// Sets the declared syntax.
    pub fn syntax(mut self, syntax: String) -> Self {
        self.inner.syntax = syntax;
        self
    }

    /// Sets the package name.
    pub fn package(mut self, package: String) -> Self {
        self.inner.package = package;
        self
    }

    /// Appends a message declaration.
    pub fn message(mut self, message: Message) -> Self {
        self.inner.messages.push(message);
        self
    }

    /// Appends an enum declaration.
    pub fn enumeration(mut self, enumeration: Enum) -> Self {
        self.inner.enums.push(enumeration);
        self
    }

    /// Appends a service declaration.
    pub fn service(mut self, service: Service) -> Self {
        self.inner.services.push(service);
        self
    }

    /// Finalizes the file model.
    pub fn build(self) -> ParsedFile {
        self.inner
    }
}

impl Message {
    /// Starts building a message with the given name.
    pub fn builder(name: impl Into<String>) -> MessageBuilder {
        MessageBuilder {
            inner: Message {
                name: name.into(),
                ..Message::default()
            },
        }
    }
}

/// One-shot builder for [`Message`].
#[derive(Debug)]
pub struct MessageBuilder {
    inner: Message,
}

impl MessageBuilder {
    /// Sets the declaration comment.
    pub fn comment(mut self, comment: String) -> Self {
        self.inner.comment = comment;
        self
    }

    /// Appends a field.
    pub fn field(mut self, field: Field) -> Self {
        self.inner.fields.push(field);
        self
    }

    /// Finalizes the message.
    pub fn build(self) -> Message {
        self.inner
    }
}

impl Field {
    /// Starts building a field with the given name and type.
    pub fn builder(name: impl Into<String>, ty: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            inner: Field {
                name: name.into(),
                ty: ty.into(),
                ..Field::default()
            },
        }
    }
}

/// One-shot builder for [`Field`].
#[derive(Debug)]
pub struct FieldBuilder {
    inner: Field,
}

impl FieldBuilder {
    /// Sets the cardinality label.
    pub fn label(mut self, label: FieldLabel) -> Self {
        self.inner.label = label;
        self
    }

    /// Sets the field number.
    pub fn number(mut self, number: u32) -> Self {
        self.inner.number = number;
        self
    }

    /// Sets the description text.
    pub fn comment(mut self, comment: String) -> Self {
        self.inner.comment = comment;
        self
    }

    /// Sets the annotation map.
    pub fn keywords(mut self, keywords: BTreeMap<Annotation, String>) -> Self {
        self.inner.keywords = keywords;
        self
    }

    /// Adds a single annotation.
    pub fn keyword(mut self, annotation: Annotation, value: impl Into<String>) -> Self {
        self.inner.keywords.insert(annotation, value.into());
        self
    }

    /// Finalizes the field.
    pub fn build(self) -> Field {
        self.inner
    }
}

impl Enum {
    /// Starts building an enum with the given name.
    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            inner: Enum {
                name: name.into(),
                ..Enum::default()
            },
        }
    }
}

/// One-shot builder for [`Enum`].
#[derive(Debug)]
pub struct EnumBuilder {
    inner: Enum,
}

impl EnumBuilder {
    /// Sets the declaration comment.
    pub fn comment(mut self, comment: String) -> Self {
        self.inner.comment = comment;
        self
    }

    /// Appends a value.
    pub fn value(mut self, value: EnumValue) -> Self {
        self.inner.values.push(value);
        self
    }

    /// Finalizes the enum.
    pub fn build(self) -> Enum {
        self.inner
    }
}

impl EnumValue {
    /// Creates a value record.
    pub fn new(name: impl Into<String>, number: u32, comment: String) -> Self {
        EnumValue {
            name: name.into(),
            number,
            comment,
        }
    }
}

impl Service {
    /// Starts building a service with the given name.
    pub fn builder(name: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder {
            inner: Service {
                name: name.into(),
                ..Service::default()
            },
        }
    }
}

/// One-shot builder for [`Service`].
#[derive(Debug)]
pub struct ServiceBuilder {
    inner: Service,
}

impl ServiceBuilder {
    /// Sets the declaration comment.
    pub fn comment(mut self, comment: String) -> Self {
        self.inner.comment = comment;
        self
    }

    /// Appends an RPC method.
    pub fn method(mut self, method: RpcMethod) -> Self {
        self.inner.methods.push(method);
        self
    }

    /// Finalizes the service.
    pub fn build(self) -> Service {
        self.inner
    }
}

impl RpcMethod {
    /// Creates a method record.
    pub fn new(
        name: impl Into<String>,
        request_type: impl Into<String>,
        response_type: impl Into<String>,
        comment: String,
    ) -> Self {
        RpcMethod {
            name: name.into(),
            request_type: request_type.into(),
            response_type: response_type.into(),
            comment,
        }
    }
}
