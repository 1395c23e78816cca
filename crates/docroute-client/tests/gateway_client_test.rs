//! Contract tests for HttpMessageDispatcher against a wiremock gateway.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docroute_client::{ClientConfig, DispatchError, HttpMessageDispatcher, MessageDispatcher};
use docroute_core::IdentifierFactory;
use docroute_message::{MEMessage, PayloadSpec};
use docroute_routing::{
    select_endpoint, EndpointRecord, ProcessMetadata, RoutingInformation,
    RoutingInformationInput, ServiceMetadata, SubmissionMetadata,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn routing() -> (RoutingInformation, String) {
    let certified = rcgen::generate_simple_self_signed(vec!["ep.example".to_string()]).unwrap();
    let cert_b64 = STANDARD.encode(certified.cert.der());

    let input = RoutingInformationInput::resolve(
        &SubmissionMetadata {
            sender_id: "s::sender".into(),
            receiver_id: "s::receiver".into(),
            document_type_id: "d::invoice".into(),
            process_id: "p::PR1".into(),
            transport_protocol: "T1".into(),
            endpoint_url: None,
            receiver_certificate: None,
        },
        IdentifierFactory::Simple,
    )
    .unwrap();

    let md = ServiceMetadata {
        participant_id: "s::receiver".into(),
        document_type_id: "d::invoice".into(),
        processes: vec![ProcessMetadata {
            process_id: "p::PR1".into(),
            endpoints: vec![EndpointRecord {
                transport_profile: "T1".into(),
                endpoint_reference: "https://ep.example/as4".into(),
                certificate: cert_b64.clone(),
                service_activation_date: None,
                service_expiration_date: None,
                require_business_level_signature: false,
                minimum_authentication_level: None,
                service_description: None,
                technical_contact_url: None,
                technical_information_url: None,
            }],
        }],
    };
    let selected = select_endpoint(
        &md,
        IdentifierFactory::Simple,
        input.process(),
        input.transport_profile(),
        chrono::Utc::now(),
    )
    .unwrap();
    (RoutingInformation::finalize(&input, selected).unwrap(), cert_b64)
}

fn message() -> MEMessage {
    MEMessage::assemble(vec![PayloadSpec {
        mime_type: "application/xml".into(),
        content_id: Some("doc@example".into()),
        data: b"<Invoice/>".to_vec(),
    }])
    .unwrap()
}

fn dispatcher(server: &MockServer) -> HttpMessageDispatcher {
    let cfg = ClientConfig::new(server.uri().parse().unwrap())
        .with_token("gw-token")
        .with_timeout_secs(5);
    HttpMessageDispatcher::new(&cfg).unwrap()
}

#[tokio::test]
async fn dispatch_posts_envelope_with_bearer_token() {
    let server = MockServer::start().await;
    let (routing, cert_b64) = routing();

    Mock::given(method("POST"))
        .and(path("/outgoing"))
        .and(header("authorization", "Bearer gw-token"))
        .and(body_partial_json(serde_json::json!({
            "senderID": "s::sender",
            "receiverID": "s::receiver",
            "documentTypeID": "d::invoice",
            "processID": "p::PR1",
            "transportProfile": "T1",
            "endpointURL": "https://ep.example/as4",
            "receiverCertificate": cert_b64,
            "payloads": [{
                "contentID": "doc@example",
                "mimeType": "application/xml",
                "value": STANDARD.encode(b"<Invoice/>")
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    dispatcher(&server).dispatch(&routing, &message()).await.unwrap();
}

#[tokio::test]
async fn gateway_4xx_is_me002() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("receiver unknown"))
        .mount(&server)
        .await;

    let (routing, _) = routing();
    let err = dispatcher(&server).dispatch(&routing, &message()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Rejected { status: 422, .. }));
    assert_eq!(err.code().id(), "ME-002");
}

#[tokio::test]
async fn gateway_5xx_is_me001_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let (routing, _) = routing();
    let err = dispatcher(&server).dispatch(&routing, &message()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Failed { status: 502, .. }));
    assert_eq!(err.code().id(), "ME-001");
}

#[tokio::test]
async fn two_dispatches_send_twice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let (routing, _) = routing();
    let d = dispatcher(&server);
    d.dispatch(&routing, &message()).await.unwrap();
    d.dispatch(&routing, &message()).await.unwrap();
}
