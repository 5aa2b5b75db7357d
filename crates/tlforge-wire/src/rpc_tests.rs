use std::cell::RefCell;
use std::io;

use crate::test_utils::{AffectedHistory, sample};
use crate::{
    Deserializer, Executor, RemoteCall, RpcError, Serializable, Serializer, SyncExecutor,
    read_object_response, response_from_bytes,
};

/// `messages.readHistory#0e306d3a peer:int max_id:int = messages.AffectedHistory;`
struct ReadHistory {
    peer: i32,
    max_id: i32,
}

impl Serializable for ReadHistory {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        s.write_u32(0x0e306d3a)?;
        s.write_i32(self.peer)?;
        s.write_i32(self.max_id)
    }

    fn serialized_size(&self) -> usize {
        12
    }
}

impl RemoteCall for ReadHistory {
    type Return = AffectedHistory;

    fn read_response(&self, d: &mut Deserializer<'_>) -> Result<AffectedHistory, RpcError> {
        read_object_response(d, "messages.AffectedHistory")
    }
}

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

/// Async executor over a fixed response, resolved eagerly.
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

#[test]
fn sync_call_round_trip() {
    let executor = Canned::new(sample().to_bytes().unwrap());

    let result = executor
        .submit_sync(ReadHistory {
            peer: 7,
            max_id: 42,
        })
        .unwrap();

    assert_eq!(result, sample());
    assert_eq!(
        executor.sent.borrow()[0],
        [0x3A, 0x6D, 0x30, 0x0E, 7, 0, 0, 0, 42, 0, 0, 0]
    );
}

#[tokio::test]
async fn async_call_round_trip() {
    let executor = Loopback {
        response: sample().to_bytes().unwrap(),
    };

    let result = executor
        .submit(ReadHistory { peer: 1, max_id: 0 })
        .await
        .unwrap();

    assert_eq!(result, sample());
}

#[test]
fn empty_response() {
    let executor = Canned::new(Vec::new());

    let err = executor
        .submit_sync(ReadHistory { peer: 1, max_id: 0 })
        .unwrap_err();

    assert!(matches!(err, RpcError::EmptyResponse));
}

#[test]
fn response_outside_family() {
    let executor = Canned::new(vec![0xB5, 0x75, 0x72, 0x99]);

    let err = executor
        .submit_sync(ReadHistory { peer: 1, max_id: 0 })
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "response type mismatch: expected messages.AffectedHistory, found 0x997275b5"
    );
}

#[test]
fn truncated_body_is_a_decode_error() {
    let mut body = sample().to_bytes().unwrap();
    body.truncate(10);
    let executor = Canned::new(body);

    let err = executor
        .submit_sync(ReadHistory { peer: 1, max_id: 0 })
        .unwrap_err();

    assert!(matches!(err, RpcError::Decode(e) if e.is_eof()));
}
