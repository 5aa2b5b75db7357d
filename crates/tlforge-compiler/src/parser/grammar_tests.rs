use indoc::indoc;

use super::{Category, parse};
use crate::model::{FlagGroupId, TypeRef};

fn parse_err(source: &str) -> String {
    parse(source).unwrap_err().to_string()
}

#[test]
fn simple_constructor() {
    let defs = parse("messages.affectedHistory#b45c69d1 pts:int pts_count:int offset:int = messages.AffectedHistory;").unwrap();

    assert_eq!(defs.len(), 1);
    let def = &defs[0];
    assert_eq!(def.category, Category::Type);
    assert_eq!(def.name, "messages.affectedHistory");
    assert_eq!(def.tag, 0xb45c69d1);
    assert!(!def.tag_inferred);
    assert_eq!(
        def.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        ["pts", "pts_count", "offset"]
    );
    assert_eq!(def.result, TypeRef::raw("messages.AffectedHistory"));
    assert_eq!(def.line, 1);
    assert_eq!(def.span, 0..24);
}

#[test]
fn sections_and_comments() {
    let defs = parse(indoc! {"
        // LAYER 1
        user#d3bc4b7a id:long = User; // trailing
        ---functions---
        users.getUser#b60f5918 id:long = User;
        ---types---
        userEmpty#200250ba id:long = User;
    "})
    .unwrap();

    let summary: Vec<_> = defs.iter().map(|d| (d.name.as_str(), d.category, d.line)).collect();
    assert_eq!(
        summary,
        [
            ("user", Category::Type, 2),
            ("users.getUser", Category::Method, 4),
            ("userEmpty", Category::Type, 6),
        ]
    );
}

#[test]
fn comment_runs_to_end_of_input() {
    let defs = parse("user#d3bc4b7a id:long = User; // = Nope; ---functions---").unwrap();

    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].category, Category::Type);
}

#[test]
fn core_definitions_are_skipped() {
    let defs = parse(indoc! {"
        int ? = Int;
        vector {t:Type} # [ t ] = Vector t;
        int128 4*[ int ] = Int128;
        boolFalse#bc799737 = Bool;
        boolTrue#997275b5 = Bool;
        true#3fedd339 = True;
        error#c4b9f9bb code:int text:string = Error;
    "})
    .unwrap();

    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "error");
}

#[test]
fn missing_tag_is_inferred() {
    let defs = parse("messages.affectedHistory pts:int pts_count:int offset:int = messages.AffectedHistory;").unwrap();

    assert_eq!(defs[0].tag, 0xb45c69d1);
    assert!(defs[0].tag_inferred);
}

#[test]
fn flag_words_and_conditionals() {
    let defs = parse(
        "channel#1 flags:# creator:flags.0?true title:flags.1?string flags2:# level:flags2.31?int = Chat;",
    )
    .unwrap();
    let params = &defs[0].params;

    assert_eq!(params[0].ty, TypeRef::FlagWord);
    assert_eq!(
        params[1].ty,
        TypeRef::Conditional {
            group: FlagGroupId(0),
            bit: 0,
            real: Box::new(TypeRef::raw("true")),
        }
    );
    assert_eq!(
        params[2].ty,
        TypeRef::Conditional {
            group: FlagGroupId(0),
            bit: 1,
            real: Box::new(TypeRef::raw("string")),
        }
    );
    assert_eq!(
        params[4].ty,
        TypeRef::Conditional {
            group: FlagGroupId(1),
            bit: 31,
            real: Box::new(TypeRef::raw("int")),
        }
    );
}

#[test]
fn vectors_and_namespaces() {
    let source = "messages.chats#64ff9fd5 chats:Vector<Chat> ids:vector<Vector<long>> = messages.Chats;";
    let defs = parse(source).unwrap();
    let params = &defs[0].params;

    assert_eq!(params[0].ty, TypeRef::vector(TypeRef::raw("Chat")));
    assert_eq!(
        params[1].ty,
        TypeRef::vector(TypeRef::vector(TypeRef::raw("long")))
    );
    assert_eq!(&source[params[0].ty_span.clone()], "Vector<Chat>");
    assert_eq!(&source[defs[0].result_span.clone()], "messages.Chats");
}

#[test]
fn generic_method() {
    let defs = parse(indoc! {"
        ---functions---
        invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X;
    "})
    .unwrap();
    let def = &defs[0];

    assert_eq!(def.generics.len(), 1);
    assert_eq!(def.generics[0].name, "X");
    assert_eq!(def.generics[0].bound, "Type");
    assert_eq!(def.params[1].ty, TypeRef::Functional("X".to_string()));
    assert_eq!(def.result, TypeRef::Any("X".to_string()));
}

#[test]
fn unbalanced_angle() {
    insta::assert_snapshot!(parse_err("foo#1 ids:Vector<int = Foo;"), @"line 1: unbalanced `<`");
    insta::assert_snapshot!(parse_err("foo#1 ids:int> = Foo;"), @"line 1: unbalanced `>`");
}

#[test]
fn unbalanced_brace() {
    insta::assert_snapshot!(parse_err("foo#1 {X:Type x:!X = X;"), @"line 1: unbalanced `{`");
    insta::assert_snapshot!(parse_err("foo#1 } = Foo;"), @"line 1: unbalanced `}`");
}

#[test]
fn invalid_tags() {
    insta::assert_snapshot!(
        parse_err("foo#12xyz = Foo;"),
        @"line 1: invalid tag `#12xyz`: expected at most 8 hexadecimal digits"
    );
    insta::assert_snapshot!(
        parse_err("foo#123456789 = Foo;"),
        @"line 1: invalid tag `#123456789`: expected at most 8 hexadecimal digits"
    );
}

#[test]
fn duplicate_parameter() {
    insta::assert_snapshot!(
        parse_err("foo#1 id:int id:long = Foo;"),
        @"line 1: duplicate parameter `id`"
    );
}

#[test]
fn flag_bit_out_of_range() {
    insta::assert_snapshot!(
        parse_err("foo#1 flags:# x:flags.32?int = Foo;"),
        @"line 1: flag bit 32 is out of range (0..=31)"
    );
}

#[test]
fn undeclared_flag_word() {
    insta::assert_snapshot!(
        parse_err("foo#1 x:flags.0?int flags:# = Foo;"),
        @"line 1: undeclared flag word `flags`"
    );
}

#[test]
fn undeclared_generic() {
    insta::assert_snapshot!(
        parse_err("---functions---\nfoo#1 query:!X = X;"),
        @"line 2: undeclared generic `X`"
    );
}

#[test]
fn literal_outside_conditional() {
    insta::assert_snapshot!(
        parse_err("foo#1 ok:true = Foo;"),
        @"line 1: `true` is only valid as the type of a conditional"
    );
    insta::assert_snapshot!(
        parse_err("foo#1 flags:# ok:flags.0?Vector<false> = Foo;"),
        @"line 1: `false` is only valid as the type of a conditional"
    );
}

#[test]
fn only_vector_is_generic() {
    insta::assert_snapshot!(
        parse_err("foo#1 x:List<int> = Foo;"),
        @"line 1: `List` takes no type arguments, only `Vector` does"
    );
}

#[test]
fn generic_result_needs_payload() {
    insta::assert_snapshot!(
        parse_err("---functions---\nfoo#1 {X:Type} layer:int = X;"),
        @"line 2: generic result `X` needs a `!X` parameter"
    );
}

#[test]
fn missing_semicolon() {
    insta::assert_snapshot!(
        parse_err("foo#1 = Foo"),
        @"line 1: expected `;`, found end of schema"
    );
}

#[test]
fn unexpected_character() {
    insta::assert_snapshot!(
        parse_err("foo#1 x:int = Foo$;"),
        @r#"line 1: unexpected character "$""#
    );
}

#[test]
fn one_generic_per_entry() {
    insta::assert_snapshot!(
        parse_err("---functions---\nfoo#1 {X:Type} {Y:Type} q:!X = X;"),
        @"line 2: an entry takes at most one generic parameter"
    );
}

#[test]
fn generic_inside_result() {
    insta::assert_snapshot!(
        parse_err("---functions---\nfoo#1 {X:Type} q:!X = Vector<X>;"),
        @"line 2: a generic result must be the placeholder itself"
    );
}
