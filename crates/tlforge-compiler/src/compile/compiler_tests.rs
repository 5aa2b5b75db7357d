use indoc::indoc;
use tlforge_wire::DecodeError;

use super::Entry;
use crate::test_utils::compiled;

#[test]
fn every_entry_is_registered() {
    let schema = compiled();

    assert_eq!(schema.constructors.len(), 13);
    assert_eq!(schema.methods.len(), 6);
    assert_eq!(schema.registry().len(), 19);
    for c in &schema.constructors {
        assert!(schema.registry().contains(c.descriptor.tag), "{}", c.descriptor);
    }
    for m in &schema.methods {
        assert!(schema.registry().contains(m.descriptor.tag), "{}", m.descriptor);
    }
}

#[test]
fn core_booleans_are_not_constructors() {
    let schema = compiled();

    assert!(schema.entry("boolTrue").is_none());
    assert!(!schema.registry().contains(0x997275b5));
}

#[test]
fn resolve_by_tag_and_name() {
    let schema = compiled();

    let entry = schema.resolve(0xb45c69d1).unwrap();
    assert_eq!(schema.name(entry), Some("messages.affectedHistory"));
    assert_eq!(schema.entry("messages.affectedHistory"), Some(entry));

    let read = schema.resolve(0x0e306d3a).unwrap();
    assert!(matches!(read, Entry::Method(_)));
    assert_eq!(schema.name(read), Some("messages.readHistory"));
    assert!(schema.constructor("messages.readHistory").is_none());
    assert!(schema.method("messages.readHistory").is_some());
}

#[test]
fn unknown_tag() {
    let schema = compiled();

    let err = schema.resolve(0xdeadbeef).unwrap_err();

    assert!(matches!(err, DecodeError::UnknownConstructor { tag: 0xdeadbeef }));
}

#[test]
fn family_membership() {
    let schema = compiled();

    assert!(schema.is_member("InputPeer", 0x7f3b18ea));
    assert!(schema.is_member("InputPeer", 0xdde8a54c));
    assert!(!schema.is_member("Peer", 0x7f3b18ea));
    assert!(!schema.is_member("messages.AffectedHistory", 0x0e306d3a));
    assert!(!schema.is_member("Peer", 0xdeadbeef));
}

#[test]
fn supertypes_are_carried_over() {
    let schema = compiled();

    let message = schema.supertype("Message").unwrap();
    assert!(message.is_abstract());
    assert_eq!(message.inherited.len(), 1);
    assert_eq!(message.inherited[0].name, "id");
    assert!(!schema.supertype("Config").unwrap().is_abstract());
}

#[test]
fn duplicate_tag_between_constructors() {
    let source = indoc! {"
        inputPeerEmpty#7f3b18ea = InputPeer;
        inputPeerSelf#7f3b18ea = InputPeer;
    "};

    let err = crate::compile(source).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"line 2: tag 0x7f3b18ea of `inputPeerSelf` is already used by `inputPeerEmpty`");
    assert_eq!(&source[err.span()], "inputPeerSelf");
}

#[test]
fn duplicate_tag_between_constructor_and_method() {
    let err = crate::compile(indoc! {"
        error#c4b9f9bb code:int text:string = Error;
        ---functions---
        help.getError#c4b9f9bb = Error;
    "})
    .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"line 3: tag 0xc4b9f9bb of `help.getError` is already used by `error`");
}

#[test]
fn inferred_tags_are_registered() {
    let schema = crate::compile(
        "messages.affectedHistory pts:int pts_count:int offset:int = messages.AffectedHistory;",
    )
    .unwrap();

    assert_eq!(schema.resolve(0xb45c69d1).unwrap(), Entry::Type(0));
}
