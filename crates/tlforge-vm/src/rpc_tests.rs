use std::cell::RefCell;

use tlforge_wire::{Executor, RemoteCall, RpcError, Serializable, SyncExecutor, response_from_bytes};

use crate::test_utils::{hex, object, runtime};
use crate::{Object, Runtime, Value};

/// Answers every request with a canned body and remembers what it sent.
struct Canned {
    response: Vec<u8>,
    sent: RefCell<Vec<Vec<u8>>>,
}

impl Canned {
    fn new(response: Vec<u8>) -> Self {
        Self {
            response,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl SyncExecutor for Canned {
    fn submit_sync<R: RemoteCall>(&self, request: R) -> Result<R::Return, RpcError> {
        self.sent.borrow_mut().push(request.to_bytes()?);
        response_from_bytes(&request, &self.response)
    }
}

struct Loopback {
    response: Vec<u8>,
}

impl Executor for Loopback {
    fn submit<R>(&self, request: R) -> impl Future<Output = Result<R::Return, RpcError>> + Send
    where
        R: RemoteCall + Send + 'static,
        R::Return: Send,
    {
        let result = response_from_bytes(&request, &self.response);
        async move { result }
    }
}

fn history(rt: &Runtime) -> Object {
    object(
        rt,
        "messages.affectedHistory",
        vec![
            ("pts", Value::Int(10)),
            ("pts_count", Value::Int(2)),
            ("offset", Value::Int(100)),
        ],
    )
}

fn read_history_params(rt: &Runtime) -> Vec<(&'static str, Value)> {
    vec![
        ("peer", object(rt, "inputPeerEmpty", vec![]).into()),
        ("max_id", Value::Int(42)),
    ]
}

#[test]
fn sync_call_round_trip() {
    let rt = runtime();
    let executor = Canned::new(rt.encode(&history(&rt)).unwrap());

    let result = rt
        .call_sync(&executor, "messages.readHistory", read_history_params(&rt))
        .unwrap();

    assert_eq!(result, Value::from(history(&rt)));
    insta::assert_snapshot!(hex(&executor.sent.borrow()[0]), @"3A 6D 30 0E EA 18 3B 7F 2A 00 00 00");
}

#[tokio::test]
async fn async_call_round_trip() {
    let rt = runtime();
    let executor = Loopback {
        response: rt.encode(&history(&rt)).unwrap(),
    };

    let result = rt
        .call(&executor, "messages.readHistory", read_history_params(&rt))
        .await
        .unwrap();

    assert_eq!(result, Value::from(history(&rt)));
}

#[test]
fn request_size_matches_encoding() {
    let rt = runtime();
    let request = rt
        .request("messages.readHistory", read_history_params(&rt))
        .unwrap();

    assert_eq!(request.serialized_size(), request.to_bytes().unwrap().len());
    assert_eq!(request.object().to_string(), "messages.readHistory#0e306d3a");
}

#[test]
fn unencodable_request_is_rejected_up_front() {
    let rt = runtime();
    let executor = Canned::new(Vec::new());
    let peer = object(&rt, "peerUser", vec![("user_id", Value::Long(1))]);
    let params = || vec![("peer", Value::from(peer.clone())), ("max_id", Value::Int(1))];

    let err = rt.request("messages.readHistory", params()).unwrap_err();
    let call = rt
        .call_sync(&executor, "messages.readHistory", params())
        .unwrap_err();

    insta::assert_snapshot!(err, @"field `peer` does not hold a value of type `InputPeer`");
    assert!(matches!(call, RpcError::Io(_)));
    assert!(executor.sent.borrow().is_empty());
}

#[test]
fn empty_response() {
    let rt = runtime();
    let executor = Canned::new(Vec::new());

    let err = rt
        .call_sync(&executor, "messages.readHistory", read_history_params(&rt))
        .unwrap_err();

    assert!(matches!(err, RpcError::EmptyResponse));
}

#[test]
fn response_outside_family() {
    let rt = runtime();
    let executor = Canned::new(vec![0xEA, 0x18, 0x3B, 0x7F]);

    let err = rt
        .call_sync(&executor, "messages.readHistory", read_history_params(&rt))
        .unwrap_err();

    insta::assert_snapshot!(err, @"response type mismatch: expected messages.AffectedHistory, found 0x7f3b18ea");
}

#[test]
fn unknown_response_tag() {
    let rt = runtime();
    let executor = Canned::new(vec![0xEF, 0xBE, 0xAD, 0xDE]);

    let err = rt
        .call_sync(&executor, "help.getConfig", Vec::<(&str, Value)>::new())
        .unwrap_err();

    insta::assert_snapshot!(err, @"unknown constructor 0xdeadbeef");
}

#[test]
fn vector_and_primitive_responses() {
    let rt = runtime();

    let views = Canned::new(vec![
        0x15, 0xC4, 0xB5, 0x1C, 2, 0, 0, 0, 9, 0, 0, 0, 8, 0, 0, 0,
    ]);
    let params = vec![
        ("peer", object(&rt, "inputPeerEmpty", vec![]).into()),
        ("id", vec![1i32, 2].into()),
        ("increment", Value::Bool(true)),
    ];
    let result = rt
        .call_sync(&views, "messages.getMessagesViews", params)
        .unwrap();
    assert_eq!(result, Value::from(vec![9i32, 8]));

    let logged_out = Canned::new(vec![0xB5, 0x75, 0x72, 0x99]);
    let result = rt
        .call_sync(&logged_out, "auth.logOut", Vec::<(&str, Value)>::new())
        .unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn object_vector_response() {
    let rt = runtime();
    let channel = object(
        &rt,
        "channel",
        vec![("id", Value::Long(7)), ("title", "news".into())],
    );
    let mut body = vec![0x15, 0xC4, 0xB5, 0x1C, 1, 0, 0, 0];
    body.extend(rt.encode(&channel).unwrap());
    let executor = Canned::new(body);

    let result = rt
        .call_sync(&executor, "channels.getChannels", vec![("id", vec![7i64].into())])
        .unwrap();

    assert_eq!(result, Value::from(vec![channel]));
}

#[test]
fn wrapped_request_decodes_inner_response() {
    let rt = runtime();
    let config = object(
        &rt,
        "config",
        vec![("date", Value::Int(1)), ("dc_options", Value::Vector(Vec::new()))],
    );
    let executor = Canned::new(rt.encode(&config).unwrap());
    let inner = object(&rt, "help.getConfig", vec![]);

    let result = rt
        .call_sync(
            &executor,
            "invokeWithLayer",
            vec![("layer", Value::Int(100)), ("query", inner.into())],
        )
        .unwrap();

    assert_eq!(result, Value::from(config));
    insta::assert_snapshot!(hex(&executor.sent.borrow()[0]), @"0D 0B 9B DA 64 00 00 00 6B 18 F9 C4");
}

#[test]
fn constructor_is_not_callable() {
    let rt = runtime();
    let executor = Canned::new(Vec::new());

    let err = rt
        .call_sync(
            &executor,
            "channel",
            vec![("id", Value::Long(1)), ("title", "x".into())],
        )
        .unwrap_err();

    insta::assert_snapshot!(err, @"io error: `channel` is a constructor, not a method");
    assert!(executor.sent.borrow().is_empty());
}
