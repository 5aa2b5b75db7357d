use super::infer_tag;

#[test]
fn bool_constructors() {
    assert_eq!(infer_tag("boolTrue = Bool"), 0x997275b5);
    assert_eq!(infer_tag("boolFalse = Bool"), 0xbc799737);
}

#[test]
fn whitespace_is_collapsed() {
    assert_eq!(infer_tag("  boolTrue\n\t=   Bool "), 0x997275b5);
}

#[test]
fn bytes_count_as_string() {
    assert_eq!(
        infer_tag("foo data:bytes = Foo"),
        infer_tag("foo data:string = Foo")
    );
    assert_eq!(
        infer_tag("foo flags:# data:flags.0?bytes = Foo"),
        infer_tag("foo flags:# data:flags.0?string = Foo")
    );
}

#[test]
fn presence_flags_are_ignored() {
    assert_eq!(
        infer_tag("foo flags:# silent:flags.1?true id:int = Foo"),
        infer_tag("foo flags:# id:int = Foo")
    );
    assert_ne!(
        infer_tag("foo flags:# id:flags.1?int = Foo"),
        infer_tag("foo flags:# = Foo")
    );
}

#[test]
fn brackets_are_dropped() {
    assert_eq!(
        infer_tag("foo ids:Vector<long> = Foo"),
        infer_tag("foo ids:Vector long = Foo")
    );
    assert_eq!(
        infer_tag("invokeWithLayer {X:Type} layer:int query:!X = X"),
        infer_tag("invokeWithLayer X:Type layer:int query:!X = X")
    );
}

#[test]
fn matches_published_tags() {
    assert_eq!(
        infer_tag("messages.affectedHistory pts:int pts_count:int offset:int = messages.AffectedHistory"),
        0xb45c69d1
    );
    assert_eq!(infer_tag("error code:int text:string = Error"), 0xc4b9f9bb);
    assert_eq!(infer_tag("inputPeerEmpty = InputPeer"), 0x7f3b18ea);
}
