use proptest::prelude::*;

use crate::Annotation;

use super::*;

#[test]
fn block_end_simple() {
    let source = "message Foo { string id = 1; }";
    let start = source.find('{').unwrap() + 1;
    assert_eq!(find_block_end(source, start), Some(source.len() - 1));
}

#[test]
fn block_end_nested() {
    let source = "{ a { b { c } } d { } }";
    assert_eq!(find_block_end(source, 1), Some(source.len() - 1));
}

#[test]
fn block_end_unterminated() {
    assert_eq!(find_block_end("{ never closed", 1), None);
    assert_eq!(find_block_end("{ nested { closed } only", 1), None);
}

fn balanced_braces() -> impl Strategy<Value = String> {
    let leaf = proptest::string::string_regex("[a-z =;.]{0,6}").unwrap();
    leaf.prop_recursive(4, 24, 4, |inner| {
        let tail = proptest::string::string_regex("[a-z =;.]{0,4}").unwrap();
        proptest::collection::vec((inner, tail), 0..4).prop_map(|parts| {
            let mut out = String::new();
            for (block, rest) in parts {
                out.push('{');
                out.push_str(&block);
                out.push('}');
                out.push_str(&rest);
            }
            out
        })
    })
}

proptest! {
    #[test]
    fn block_end_matches_arbitrary_nesting(body in balanced_braces()) {
        let source = format!("{{{body}}}");
        prop_assert_eq!(find_block_end(&source, 1), Some(source.len() - 1));
    }
}

#[test]
fn prelude_collects_file_comment() {
    let file = parse_file(
        "// Copyright header.\n\
         syntax = \"proto3\";\n\
         // User API.\n\
         package user.v1;\n",
    );
    assert_eq!(file.file_comment, "Copyright header. User API.");
    assert_eq!(file.syntax, "proto3");
    assert_eq!(file.package, "user.v1");
}

#[test]
fn prelude_stops_collecting_at_imports() {
    let file = parse_file(
        "syntax = \"proto3\";\n\
         import \"other.proto\";\n\
         // Attached to the message, not the file.\n\
         message M {}\n",
    );
    assert_eq!(file.file_comment, "");
    assert_eq!(file.package, "");
    assert_eq!(file.messages.len(), 1);
    assert_eq!(file.messages[0].comment, "Attached to the message, not the file.");
}

#[test]
fn prelude_finds_package_after_imports() {
    let file = parse_file(
        "syntax = \"proto3\";\n\
         import \"other.proto\";\n\
         package billing.v2;\n",
    );
    assert_eq!(file.package, "billing.v2");
}

#[test]
fn empty_source() {
    let file = parse_file("");
    assert_eq!(file, ParsedFile::default());
}

#[test]
fn keyword_inside_comment_or_string_is_not_structure() {
    let file = parse_file(
        "// message Fake {\n\
         option note = \"message AlsoFake {\";\n\
         message Real {}\n",
    );
    let names: Vec<&str> = file.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Real"]);
}

#[test]
fn bare_keyword_is_not_a_declaration() {
    let file = parse_file("message only\nmessage Valid {}\n");
    let names: Vec<&str> = file.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Valid"]);
}

#[test]
fn inner_messages_are_not_extracted() {
    let file = parse_file(
        "message Outer {\n\
           message Inner {\n\
             string nested = 1;\n\
           }\n\
           string own = 2;\n\
         }\n",
    );
    assert_eq!(file.messages.len(), 1);
    let outer = &file.messages[0];
    assert_eq!(outer.name, "Outer");
    // Inner declarations stay part of the parent's body text, so their field
    // statements surface on the parent.
    let names: Vec<&str> = outer.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["nested", "own"]);
}

#[test]
fn field_labels_and_types() {
    let file = parse_file(
        "message Kitchen {\n\
           string sink = 1;\n\
           optional int32 taps = 2;\n\
           repeated user.v1.User chefs = 3;\n\
           map<string, int64> counts = 4;\n\
         }\n",
    );
    let fields = &file.messages[0].fields;
    assert_eq!(fields.len(), 4);

    assert_eq!(fields[0].ty, "string");
    assert_eq!(fields[0].label, FieldLabel::None);
    assert_eq!(fields[0].number, 1);

    assert_eq!(fields[1].label, FieldLabel::Optional);
    assert_eq!(fields[2].label, FieldLabel::Repeated);
    assert_eq!(fields[2].ty, "user.v1.User");
    assert_eq!(fields[3].ty, "map<string, int64>");
    assert_eq!(fields[3].name, "counts");
}

#[test]
fn field_options_are_skipped() {
    let file = parse_file(
        "message Packed {\n\
           repeated int32 counts = 1 [packed = true, deprecated = true];\n\
         }\n",
    );
    let fields = &file.messages[0].fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "counts");
}

#[test]
fn option_aggregate_does_not_truncate_body() {
    let file = parse_file(
        "message Settings {\n\
           option (custom.defaults) = { values: { a: 1, b: 2 } };\n\
           string after = 1;\n\
         }\n",
    );
    let fields = &file.messages[0].fields;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "after");
}

#[test]
fn field_number_overflow_skips_declaration() {
    let file = parse_file(
        "message M {\n\
           uint64 big = 4294967296;\n\
           string ok = 1;\n\
         }\n",
    );
    let names: Vec<&str> = file.messages[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["ok"]);
}

#[test]
fn field_comment_inline_fallback() {
    let file = parse_file(
        "message M {\n\
           int32 count = 1; // how many\n\
         }\n",
    );
    assert_eq!(file.messages[0].fields[0].comment, "how many");
}

#[test]
fn field_comment_block_takes_priority() {
    let file = parse_file(
        "message M {\n\
           // block wins\n\
           int32 count = 1; // inline loses\n\
         }\n",
    );
    assert_eq!(file.messages[0].fields[0].comment, "block wins");
}

#[test]
fn field_annotations_extracted() {
    let file = parse_file(
        "message User {\n\
           // Display name.\n\
           // @MinLength 1\n\
           // @MaxLength: 64\n\
           // @Default = anonymous\n\
           string name = 1;\n\
         }\n",
    );
    let field = &file.messages[0].fields[0];
    assert_eq!(field.comment, "Display name.");
    assert_eq!(field.keywords[&Annotation::MinLength], "1");
    assert_eq!(field.keywords[&Annotation::MaxLength], "64");
    assert_eq!(field.keywords[&Annotation::Default], "anonymous");
}

#[test]
fn enum_values_and_comments() {
    let file = parse_file(
        "// Account states.\n\
         enum Status {\n\
           option allow_alias = true;\n\
           // Default.\n\
           STATUS_UNSPECIFIED = 0;\n\
           ACTIVE = 1; // running\n\
         }\n",
    );
    assert_eq!(file.enums.len(), 1);
    let status = &file.enums[0];
    assert_eq!(status.comment, "Account states.");
    assert_eq!(status.values.len(), 2);
    assert_eq!(status.values[0].name, "STATUS_UNSPECIFIED");
    assert_eq!(status.values[0].number, 0);
    assert_eq!(status.values[0].comment, "Default.");
    assert_eq!(status.values[1].comment, "running");
}

#[test]
fn enum_nested_in_message_is_still_found() {
    let file = parse_file(
        "message Account {\n\
           enum Kind {\n\
             KIND_UNSPECIFIED = 0;\n\
           }\n\
           Kind kind = 1;\n\
         }\n",
    );
    assert_eq!(file.enums.len(), 1);
    assert_eq!(file.enums[0].name, "Kind");
    // The enum body is opaque to the field scanner: bare `NAME = N;`
    // statements do not match the field pattern.
    let names: Vec<&str> = file.messages[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["kind"]);
}

#[test]
fn service_methods() {
    let file = parse_file(
        "service Watcher {\n\
           // Streams updates.\n\
           rpc Watch(WatchRequest) returns (stream WatchResponse) {\n\
             option (custom.retry) = { attempts: 3 };\n\
           }\n\
           rpc Ping(PingRequest) returns (PingResponse);\n\
         }\n",
    );
    assert_eq!(file.services.len(), 1);
    let watcher = &file.services[0];
    assert_eq!(watcher.methods.len(), 2);

    let watch = &watcher.methods[0];
    assert_eq!(watch.name, "Watch");
    assert_eq!(watch.request_type, "WatchRequest");
    assert_eq!(watch.response_type, "WatchResponse");
    assert_eq!(watch.comment, "Streams updates.");

    assert_eq!(watcher.methods[1].name, "Ping");
}

#[test]
fn unterminated_message_is_skipped_locally() {
    let file = parse_file(
        "message Broken {\n\
           string id = 1;\n\
         enum Status { ACTIVE = 0; }\n\
         service Api { rpc Do(In) returns (Out); }\n",
    );
    assert!(file.messages.is_empty());
    assert_eq!(file.enums.len(), 1);
    assert_eq!(file.enums[0].name, "Status");
    assert_eq!(file.services.len(), 1);
    assert_eq!(file.services[0].methods.len(), 1);
}

#[test]
fn block_comment_attachment() {
    let file = parse_file(
        "/*\n\
          * Manages user accounts.\n\
          */\n\
         service UserService {\n\
           rpc GetUser(GetUserRequest) returns (GetUserResponse);\n\
         }\n",
    );
    assert_eq!(file.services[0].comment, "Manages user accounts.");
}

#[test]
fn cross_references_in_declaration_comments() {
    let file = parse_file(
        "// Pairs with @Ref Account records.\n\
         message Profile {\n\
           // Owner, see @Ref user.v1.User\n\
           string owner_id = 1;\n\
         }\n",
    );
    assert_eq!(
        file.messages[0].comment,
        "Pairs with :ref:`Account <proto-Account>` records."
    );
    assert_eq!(
        file.messages[0].fields[0].comment,
        "Owner, see :ref:`user.v1.User <proto-user.v1.User>`"
    );
}
