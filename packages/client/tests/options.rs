use xfer_client::{
    CurlEngine, HeaderList, Info, Opt, OptValue, Session, TransferCode, TransferEngine, ValueKind,
};

#[test]
fn test_option_ids_round_trip() {
    for opt in Opt::ALL {
        assert_eq!(Opt::from_id(opt.id()), Some(*opt));
    }
    assert_eq!(Opt::from_id(10002), Some(Opt::Url));
    assert_eq!(Opt::from_id(30115), Some(Opt::InFileSize));
    assert_eq!(Info::from_id(0x20_0002), Some(Info::ResponseCode));
}

#[test]
fn test_list_options_are_flagged() {
    let lists: Vec<Opt> = Opt::ALL.iter().copied().filter(|opt| opt.is_list()).collect();
    assert_eq!(
        lists,
        vec![
            Opt::HttpHeader,
            Opt::Quote,
            Opt::PostQuote,
            Opt::PreQuote,
            Opt::Http200Aliases,
            Opt::MailRcpt,
            Opt::Resolve,
            Opt::ConnectTo,
        ]
    );
    for opt in lists {
        assert_eq!(opt.kind(), ValueKind::List);
    }
}

#[test]
fn test_header_list_collects_entries() {
    let mut list: HeaderList = ["A: 1", "B: 2"].into_iter().collect();
    list.append("Expect:");
    assert_eq!(list.len(), 3);
    assert_eq!(list.iter().last(), Some("Expect:"));
    assert!(list.contains("B: 2"));
    assert!(!HeaderList::single("x").is_empty());
}

#[test]
fn test_transfer_code_display() {
    assert_eq!(TransferCode::OK.to_string(), "code 0");
    assert!(TransferCode::OK.is_success());
    assert!(!TransferCode::COULDNT_RESOLVE_HOST.is_success());
    assert_eq!(TransferCode::OPERATION_TIMEDOUT.raw(), 28);
}

#[test]
fn test_curl_engine_accepts_typed_options() {
    let mut engine = CurlEngine::init().expect("libcurl handle");

    engine
        .set(Opt::Url, OptValue::Str("http://localhost/".into()))
        .expect("url");
    engine.set(Opt::Verbose, OptValue::Long(0)).expect("verbose");
    engine.set(Opt::InFileSize, OptValue::Large(42)).expect("size");
    engine
        .set(Opt::Resolve, OptValue::List(HeaderList::single("localhost:80:127.0.0.1")))
        .expect("resolve");

    let err = engine
        .set(Opt::Url, OptValue::Long(1))
        .expect_err("kind mismatch");
    assert!(err.is_option());
}

#[test]
fn test_curl_engine_owns_raw_lists() {
    let mut engine = CurlEngine::init().expect("libcurl handle");

    for (opt, entry) in [
        (Opt::Quote, "NOOP"),
        (Opt::PreQuote, "PWD"),
        (Opt::PostQuote, "SYST"),
        (Opt::Http200Aliases, "ICY 200 OK"),
        (Opt::MailRcpt, "<ops@example.com>"),
    ] {
        engine
            .set(opt, OptValue::List(HeaderList::single(entry)))
            .expect("list option");
    }
    engine
        .set(Opt::Quote, OptValue::List(["CWD /", "NOOP"].into_iter().collect()))
        .expect("replacement list");
    engine
        .set(Opt::Http200Aliases, OptValue::List(HeaderList::new()))
        .expect("empty list clears the option");

    engine.reset();
    engine
        .set(Opt::PostQuote, OptValue::List(HeaderList::single("QUIT")))
        .expect("list after reset");
}

#[test]
fn test_curl_list_entry_with_nul_is_rejected() {
    let mut engine = CurlEngine::init().expect("libcurl handle");
    let err = engine
        .set(Opt::Quote, OptValue::List(HeaderList::single("NO\0OP")))
        .expect_err("interior nul");
    assert!(err.is_option());
}

#[test]
fn test_session_tracks_quote_lists_on_libcurl() {
    let mut session = Session::new();
    session.set_option_str(Opt::Quote, "NOOP").expect("quote");
    session.set_option_str(Opt::Http200Aliases, "ICY 200 OK").expect("aliases");
    assert_eq!(session.tracked_lists().len(), 2);

    session.reset();
    assert!(session.tracked_lists().is_empty());
}

#[test]
fn test_curl_engine_info_before_transfer() {
    let mut engine = CurlEngine::init().expect("libcurl handle");

    assert_eq!(engine.get_long(Info::ResponseCode).expect("code"), 0);
    assert_eq!(engine.get_double(Info::TotalTime).expect("time"), 0.0);
    assert!(engine.get_long(Info::EffectiveUrl).expect_err("kind").is_info());
}

#[test]
fn test_curl_engine_describes_codes() {
    let message = CurlEngine::describe(TransferCode::COULDNT_CONNECT);
    assert!(message.to_lowercase().contains("connect"), "{message}");
}

#[test]
fn test_curl_duplicate_replays_options() {
    let mut engine = CurlEngine::init().expect("libcurl handle");
    engine
        .set(Opt::UserAgent, OptValue::Str("dup/1.0".into()))
        .expect("agent");
    engine.duplicate().expect("duplicate");
}

#[test]
fn test_default_session_is_live() {
    let session = Session::new();
    assert!(session.is_live());
    assert!(session.config().verbose);
}
