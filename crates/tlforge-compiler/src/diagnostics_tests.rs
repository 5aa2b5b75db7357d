use indoc::indoc;

use crate::diagnostics::render;

#[test]
fn unknown_type_points_at_reference() {
    let source = "user#00000001 status:UserStatus = User;";
    let err = crate::compile(source).unwrap_err();

    insta::assert_snapshot!(render(&err, source), @r"
    error: unknown type `UserStatus`
      |
    1 | user#00000001 status:UserStatus = User;
      |                      ^^^^^^^^^^
    ");
}

#[test]
fn duplicate_tag_points_at_second_entry() {
    let source = indoc! {"
        inputPeerEmpty#7f3b18ea = InputPeer;
        inputPeerSelf#7f3b18ea = InputPeer;
    "};
    let err = crate::compile(source).unwrap_err();

    insta::assert_snapshot!(render(&err, source), @r"
    error: tag 0x7f3b18ea of `inputPeerSelf` is already used by `inputPeerEmpty`
      |
    2 | inputPeerSelf#7f3b18ea = InputPeer;
      | ^^^^^^^^^^^^^
    ");
}

#[test]
fn path_is_shown() {
    let source = "user#00000001 status:UserStatus = User;";
    let err = crate::compile(source).unwrap_err();

    let output = err.printer().source(source).path("api.tl").render();

    assert!(output.contains(" --> api.tl:1:22"));
}

#[test]
fn without_source_falls_back_to_display() {
    let err = crate::compile("user#00000001 status:UserStatus = User;").unwrap_err();

    insta::assert_snapshot!(err.printer().render(), @"line 1: unknown type `UserStatus`");
}
