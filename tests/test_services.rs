use switchyard::service::echo::FIELD_NOT_FOUND;
use switchyard::service::hello::{DECODE_FAILED, NO_NAME};
use switchyard::service::{
    ECHO, EchoService, HELLO, HelloService, Service, ServiceRegistry, register_defaults,
};

#[test]
fn test_hello_greets_decoded_name() {
    let hello = HelloService;

    assert_eq!(hello.respond("/app?name=Pedro"), "Hola, Pedro");
    assert_eq!(hello.respond("/app/hello?name=John%20Doe"), "Hola, John Doe");
    assert_eq!(hello.respond("/app?name=Mar%C3%ADa+Jos%C3%A9"), "Hola, María José");
}

#[test]
fn test_hello_takes_value_up_to_next_equals() {
    let hello = HelloService;
    assert_eq!(hello.respond("/app?name=ana=extra"), "Hola, ana");
}

#[test]
fn test_hello_without_name() {
    let hello = HelloService;

    assert_eq!(hello.respond("/app"), NO_NAME);
    assert_eq!(hello.respond("/app/hello?name="), NO_NAME);
}

#[test]
fn test_hello_ignores_trailing_equals() {
    let hello = HelloService;

    assert_eq!(hello.respond("/app?name=="), NO_NAME);
    assert_eq!(hello.respond("/app?a==="), NO_NAME);
    assert_eq!(hello.respond("/app?name==x"), "Hola, ");
    assert_eq!(hello.respond("/app?name=ana=="), "Hola, ana");
}

#[test]
fn test_hello_bad_encoding() {
    let hello = HelloService;

    assert_eq!(hello.respond("/app?name=%G1"), DECODE_FAILED);
    assert_eq!(hello.respond("/app?name=%FF"), DECODE_FAILED);
}

#[test]
fn test_echo_extracts_text_field() {
    let echo = EchoService::new().unwrap();

    assert_eq!(echo.respond(r#"{"text":"hello"}"#), "Echo: hello");
    assert_eq!(echo.respond(r#"{ "id": 3, "text" :  "spaced out" }"#), "Echo: spaced out");
    assert_eq!(echo.respond(r#"{"text":""}"#), "Echo: ");
}

#[test]
fn test_echo_first_match_wins() {
    let echo = EchoService::new().unwrap();
    assert_eq!(echo.respond(r#"{"text":"a","text":"b"}"#), "Echo: a");
}

#[test]
fn test_echo_missing_field() {
    let echo = EchoService::new().unwrap();

    let missing = format!("Echo: {}", FIELD_NOT_FOUND);

    assert_eq!(echo.respond(r#"{"message":"hello"}"#), missing);
    assert_eq!(echo.respond(""), missing);
    assert_eq!(echo.respond(r#"{"text": 5}"#), missing);
}

#[test]
fn test_services_are_stateless() {
    let hello = HelloService;
    let echo = EchoService::new().unwrap();

    assert_eq!(hello.respond("/app?name=x"), hello.respond("/app?name=x"));
    assert_eq!(echo.respond(r#"{"text":"x"}"#), echo.respond(r#"{"text":"x"}"#));
}

#[test]
fn test_registry_defaults() {
    let mut registry = ServiceRegistry::new();
    register_defaults(&mut registry).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec![ECHO, HELLO]);
    assert!(registry.contains(HELLO));
    assert_eq!(
        registry.get(HELLO).unwrap().respond("/app?name=Ana"),
        "Hola, Ana"
    );
}

#[test]
fn test_registry_rejects_duplicate_names() {
    let mut registry = ServiceRegistry::new();
    registry.register("hello", HelloService).unwrap();

    let err = registry.register("hello", HelloService).unwrap_err();
    assert!(err.to_string().contains("hello"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_accepts_closures() {
    let mut registry = ServiceRegistry::new();
    registry
        .register("upper", |payload: &str| payload.to_uppercase())
        .unwrap();

    assert_eq!(registry.get("upper").unwrap().respond("abc"), "ABC");
    assert!(registry.get("missing").is_none());
}
