use crate::{Object, Runtime, Value};

pub const SCHEMA: &str = include_str!("fixture.tl");

pub fn runtime() -> Runtime {
    Runtime::compile(SCHEMA).unwrap()
}

pub fn object(runtime: &Runtime, name: &str, fields: Vec<(&str, Value)>) -> Object {
    runtime.instantiate(name, fields).unwrap()
}

pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
