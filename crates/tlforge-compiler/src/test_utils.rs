use indoc::indoc;

use crate::CompiledSchema;

/// A small schema touching every construct the compiler understands.
pub const SCHEMA: &str = indoc! {"
    boolFalse#bc799737 = Bool;
    boolTrue#997275b5 = Bool;

    error#c4b9f9bb code:int text:string = Error;

    inputPeerEmpty#7f3b18ea = InputPeer;
    inputPeerUser#dde8a54c user_id:long access_hash:long = InputPeer;

    peerUser#59511722 user_id:long = Peer;
    peerChat#36c6019a chat_id:long = Peer;

    chatPhotoEmpty#37c1011c = ChatPhoto;
    chatPhoto#1c6e1c11 flags:# has_video:flags.0?true photo_id:long dc_id:int = ChatPhoto;

    channel#0aadfc8f flags:# creator:flags.0?true broadcast:flags.5?true id:long title:string photo:flags.1?ChatPhoto verified:flags.1?Bool participants_count:flags.2?int = Chat;

    messageEmpty#90a6ca84 id:int = Message;
    message#38116ee0 flags:# out:flags.1?true id:int peer_id:Peer message:string = Message;

    dcOption#18b7a10d id:int ip_address:string port:int = DcOption;
    config#330b4067 date:int dc_options:Vector<dcOption> = Config;

    messages.affectedHistory#b45c69d1 pts:int pts_count:int offset:int = messages.AffectedHistory;

    ---functions---

    invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X;
    messages.readHistory#0e306d3a peer:InputPeer max_id:int = messages.AffectedHistory;
    messages.getMessagesViews#5784d3e1 peer:InputPeer id:Vector<int> increment:Bool = Vector<int>;
    channels.getChannels#0a7f6bbb id:Vector<long> = Vector<Chat>;
    help.getConfig#c4f9186b = Config;
    auth.logOut#5717da40 = Bool;
"};

pub fn compiled() -> CompiledSchema {
    crate::compile(SCHEMA).unwrap()
}

/// One line per step, as the layout would be listed in a dump.
pub fn steps_of(schema: &CompiledSchema, name: &str) -> String {
    let entry = schema.entry(name).unwrap();
    let (_, layout) = schema.layout(entry).unwrap();
    layout
        .steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
