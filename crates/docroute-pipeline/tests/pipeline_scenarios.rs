//! End-to-end pipeline scenarios with in-process collaborator doubles.
//!
//! Each double counts its calls and records what it was given, so the tests
//! can assert which stages ran and with which inputs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docroute_client::{
    DirectoryClient, DirectoryError, DispatchError, LookupQuery, MessageDispatcher,
    ValidationEngine, ValidationEngineError,
};
use docroute_core::{
    ExecutorSetId, IdentifierFactory, Severity, ValidationEntry, ValidationResultList,
};
use docroute_message::{MEMessage, MessageError, SubmittedPayload};
use docroute_pipeline::{
    OutgoingMessage, ParameterError, Pipeline, PipelineError, PipelineState, ValidationStage,
};
use docroute_routing::{
    EndpointRecord, ProcessMetadata, RoutingInformation, RoutingInputError, ServiceMetadata,
    SubmissionMetadata,
};

// -- Doubles ------------------------------------------------------------------

enum DirectoryAnswer {
    Found(ServiceMetadata),
    NotFound,
    Status(u16),
}

struct FakeDirectory {
    answer: DirectoryAnswer,
    calls: AtomicUsize,
    queries: Mutex<Vec<LookupQuery>>,
}

impl FakeDirectory {
    fn new(answer: DirectoryAnswer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn lookup(&self, query: &LookupQuery) -> Result<Option<ServiceMetadata>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        match &self.answer {
            DirectoryAnswer::Found(md) => Ok(Some(md.clone())),
            DirectoryAnswer::NotFound => Ok(None),
            DirectoryAnswer::Status(status) => Err(DirectoryError::Status {
                endpoint: "GET /fake".into(),
                status: *status,
                body: "unavailable".into(),
            }),
        }
    }
}

struct FakeEngine {
    answer: Result<ValidationResultList, String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<u8>>>,
}

impl FakeEngine {
    fn returning(entries: Vec<ValidationEntry>) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(ValidationResultList::new(entries)),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn unknown_set() -> Arc<Self> {
        Arc::new(Self {
            answer: Err("g:a:1.0".into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ValidationEngine for FakeEngine {
    async fn validate(
        &self,
        _executor_set: &ExecutorSetId,
        document: &[u8],
    ) -> Result<ValidationResultList, ValidationEngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(document.to_vec());
        self.answer
            .clone()
            .map_err(ValidationEngineError::UnknownExecutorSet)
    }
}

struct FakeDispatcher {
    reject_with: Option<u16>,
    calls: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
    /// `(content ID, bytes)` per payload, per dispatched message.
    messages: Mutex<Vec<Vec<(String, Vec<u8>)>>>,
}

impl FakeDispatcher {
    fn accepting() -> Arc<Self> {
        Arc::new(Self {
            reject_with: None,
            calls: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        })
    }

    fn rejecting(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reject_with: Some(status),
            calls: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MessageDispatcher for FakeDispatcher {
    async fn dispatch(
        &self,
        routing: &RoutingInformation,
        message: &MEMessage,
    ) -> Result<(), DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(
            message
                .payloads()
                .iter()
                .map(|p| (p.content_id().to_string(), p.data().to_vec()))
                .collect(),
        );
        self.endpoints
            .lock()
            .unwrap()
            .push(routing.endpoint_url().to_string());
        match self.reject_with {
            None => Ok(()),
            Some(status) => Err(DispatchError::Rejected {
                status,
                body: "refused".into(),
            }),
        }
    }
}

// -- Fixtures -----------------------------------------------------------------

fn cert_b64() -> &'static str {
    static CERT: OnceLock<String> = OnceLock::new();
    CERT.get_or_init(|| {
        let certified = rcgen::generate_simple_self_signed(vec!["ep.example".to_string()]).unwrap();
        STANDARD.encode(certified.cert.der())
    })
}

fn endpoint(transport: &str, url: &str, cert: &str) -> EndpointRecord {
    EndpointRecord {
        transport_profile: transport.into(),
        endpoint_reference: url.into(),
        certificate: cert.into(),
        service_activation_date: None,
        service_expiration_date: None,
        require_business_level_signature: false,
        minimum_authentication_level: None,
        service_description: None,
        technical_contact_url: None,
        technical_information_url: None,
    }
}

fn metadata(process: &str, endpoints: Vec<EndpointRecord>) -> ServiceMetadata {
    ServiceMetadata {
        participant_id: "s::receiver".into(),
        document_type_id: "d::invoice".into(),
        processes: vec![ProcessMetadata {
            process_id: process.into(),
            endpoints,
        }],
    }
}

fn matching_metadata() -> ServiceMetadata {
    metadata("p::PR1", vec![endpoint("T1", "https://ep.example/as4", cert_b64())])
}

fn submission() -> OutgoingMessage {
    OutgoingMessage {
        metadata: SubmissionMetadata {
            sender_id: "s::sender".into(),
            receiver_id: "s::receiver".into(),
            document_type_id: "d::invoice".into(),
            process_id: "p::PR1".into(),
            transport_protocol: "T1".into(),
            endpoint_url: None,
            receiver_certificate: None,
        },
        payloads: vec![SubmittedPayload {
            mime_type: "application/xml".into(),
            content_id: None,
            value: STANDARD.encode(b"<Invoice/>"),
        }],
    }
}

fn entry(severity: Severity) -> ValidationEntry {
    ValidationEntry {
        rule: "BR-01".into(),
        severity,
        message: "finding".into(),
        location: None,
    }
}

fn pipeline(
    validation: ValidationStage,
    directory: Arc<FakeDirectory>,
    dispatcher: Arc<FakeDispatcher>,
) -> Pipeline {
    Pipeline::new(IdentifierFactory::Simple, validation, directory, dispatcher)
}

fn profile() -> ExecutorSetId {
    ExecutorSetId::parse("g:a:1.0").unwrap()
}

// -- Scenarios ----------------------------------------------------------------

#[tokio::test]
async fn matching_endpoint_is_sent() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory.clone(), dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::Sent);
    assert!(report.success);
    assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        dispatcher.endpoints.lock().unwrap().as_slice(),
        ["https://ep.example/as4".to_string()]
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["senderid"], "s::sender");
    assert_eq!(json["receiverid"], "s::receiver");
    assert_eq!(json["documentTypeID"], "d::invoice");
    assert_eq!(json["processID"], "p::PR1");
    assert_eq!(json["transportProfile"], "T1");
    assert_eq!(json["validation-skipped"], true);
    assert_eq!(json["lookup-results"]["success"], true);
    assert_eq!(json["lookup-results"]["endpointReference"], "https://ep.example/as4");
    assert_eq!(json["lookup-results"]["response"]["participantID"], "s::receiver");
    assert_eq!(json["sending-results"]["success"], true);
    assert_eq!(json["state"], "SENT");
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn multi_payload_message_keeps_order_and_validates_primary_only() {
    let engine = FakeEngine::returning(vec![entry(Severity::Info)]);
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(
        ValidationStage::new(profile(), engine.clone()),
        directory.clone(),
        dispatcher.clone(),
    );

    let mut msg = submission();
    msg.payloads = vec![
        SubmittedPayload {
            mime_type: "application/xml".into(),
            content_id: Some("invoice@sender".into()),
            value: STANDARD.encode(b"<Invoice/>"),
        },
        SubmittedPayload {
            mime_type: "application/pdf".into(),
            content_id: None,
            value: STANDARD.encode(b"%PDF-1.7"),
        },
        SubmittedPayload {
            mime_type: "text/plain".into(),
            content_id: None,
            value: STANDARD.encode(b"note"),
        },
    ];

    let report = p.submit(&msg).await.unwrap();
    assert_eq!(report.state, PipelineState::Sent);

    assert_eq!(engine.seen.lock().unwrap().as_slice(), [b"<Invoice/>".to_vec()]);

    let queries = directory.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].participant.uri_encoded(), "s::receiver");
    assert_eq!(queries[0].document_type.uri_encoded(), "d::invoice");
    assert_eq!(
        queries[0].process.as_ref().map(|p| p.uri_encoded()),
        Some("p::PR1".to_string())
    );

    let messages = dispatcher.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    let sent = &messages[0];
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].0, "invoice@sender");
    assert!(sent[1].0.ends_with("@docroute"));
    assert!(sent[2].0.ends_with("@docroute"));
    assert_ne!(sent[1].0, sent[2].0);
    let bytes: Vec<&[u8]> = sent.iter().map(|(_, data)| data.as_slice()).collect();
    assert_eq!(bytes, [&b"<Invoice/>"[..], &b"%PDF-1.7"[..], &b"note"[..]]);
}

#[tokio::test]
async fn no_matching_endpoint_is_not_sent() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(metadata(
        "p::PR1",
        vec![endpoint("T2", "https://ep.example/as4", cert_b64())],
    )));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::NoMatch);
    assert!(!report.success);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lookup-results"]["success"], false);
    assert!(json["lookup-results"]["response"].is_object());
    assert!(json.get("sending-results").is_none());
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn unregistered_receiver_is_no_match() {
    let directory = FakeDirectory::new(DirectoryAnswer::NotFound);
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::NoMatch);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lookup-results"]["success"], false);
    assert!(json["lookup-results"].get("response").is_none());
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_errors_block_lookup_and_sending() {
    let engine = FakeEngine::returning(vec![entry(Severity::Warning), entry(Severity::Error)]);
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(
        ValidationStage::new(profile(), engine.clone()),
        directory.clone(),
        dispatcher.clone(),
    );

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::ValidationFailed);
    assert!(!report.success);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["validation-results"]["success"], false);
    assert_eq!(json["validation-results"]["executorSet"], "g:a:1.0");
    assert_eq!(json["validation-results"]["results"][1]["severity"], "error");
    assert!(json.get("validation-skipped").is_none());
    assert!(json.get("lookup-results").is_none());
    assert!(json.get("sending-results").is_none());
}

#[tokio::test]
async fn warnings_do_not_block() {
    let engine = FakeEngine::returning(vec![entry(Severity::Warning)]);
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(
        ValidationStage::new(profile(), engine.clone()),
        directory,
        dispatcher.clone(),
    );

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::Sent);
    assert_eq!(engine.seen.lock().unwrap().as_slice(), [b"<Invoice/>".to_vec()]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["validation-results"]["success"], true);
}

#[tokio::test]
async fn validation_engine_failure_blocks_with_code() {
    let engine = FakeEngine::unknown_set();
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let p = pipeline(
        ValidationStage::new(profile(), engine),
        directory.clone(),
        FakeDispatcher::accepting(),
    );

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::ValidationFailed);
    assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["validation-results"]["error"]["code"], "VAL-002");
}

#[tokio::test]
async fn directory_failure_is_lookup_failed() {
    let directory = FakeDirectory::new(DirectoryAnswer::Status(503));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::LookupFailed);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lookup-results"]["error"]["code"], "DD-001");
}

#[tokio::test]
async fn malformed_matching_endpoint_is_hard_failure() {
    let bad_cert = STANDARD.encode(b"not a certificate");
    let directory = FakeDirectory::new(DirectoryAnswer::Found(metadata(
        "p::PR1",
        vec![endpoint("T1", "https://ep.example/as4", &bad_cert)],
    )));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::LookupFailed);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lookup-results"]["error"]["code"], "DD-003");
    assert!(json["lookup-results"]["response"].is_object());
}

#[tokio::test]
async fn dispatch_rejection_is_reported() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::rejecting(400);
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    let report = p.submit(&submission()).await.unwrap();
    assert_eq!(report.state, PipelineState::DispatchFailed);
    assert!(!report.success);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lookup-results"]["success"], true);
    assert_eq!(json["sending-results"]["success"], false);
    assert_eq!(json["sending-results"]["error"]["code"], "ME-002");
}

#[tokio::test]
async fn identical_submissions_dispatch_twice() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory, dispatcher.clone());

    p.submit(&submission()).await.unwrap();
    p.submit(&submission()).await.unwrap();
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 2);
}

// -- Parameter errors ---------------------------------------------------------

fn assert_no_calls(directory: &FakeDirectory, dispatcher: &FakeDispatcher) {
    assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn prefilled_endpoint_url_aborts_before_any_stage() {
    let engine = FakeEngine::returning(vec![]);
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(
        ValidationStage::new(profile(), engine.clone()),
        directory.clone(),
        dispatcher.clone(),
    );

    let mut msg = submission();
    msg.metadata.endpoint_url = Some("https://attacker.example/as4".into());
    let err = p.submit(&msg).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parameter(ParameterError::Routing(RoutingInputError::EndpointUrlPresent))
    ));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    assert_no_calls(&directory, &dispatcher);
}

#[tokio::test]
async fn prefilled_certificate_aborts_before_any_stage() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory.clone(), dispatcher.clone());

    let mut msg = submission();
    msg.metadata.receiver_certificate = Some(cert_b64().to_string());
    let err = p.submit(&msg).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parameter(ParameterError::Routing(RoutingInputError::CertificatePresent))
    ));
    assert_no_calls(&directory, &dispatcher);
}

#[tokio::test]
async fn empty_payloads_abort_before_any_stage() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory.clone(), dispatcher.clone());

    let mut msg = submission();
    msg.payloads.clear();
    let err = p.submit(&msg).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parameter(ParameterError::Message(MessageError::NoPayloads))
    ));
    assert_no_calls(&directory, &dispatcher);
}

#[tokio::test]
async fn bad_identifier_aborts_before_any_stage() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let dispatcher = FakeDispatcher::accepting();
    let p = pipeline(ValidationStage::disabled(), directory.clone(), dispatcher.clone());

    let mut msg = submission();
    msg.metadata.receiver_id = "no-separator".into();
    let err = p.submit(&msg).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parameter(ParameterError::Routing(
            RoutingInputError::InvalidIdentifier { field: "receiverID", .. }
        ))
    ));
    assert_no_calls(&directory, &dispatcher);
}

// -- Standalone lookup --------------------------------------------------------

#[tokio::test]
async fn lookup_reports_directory_answer() {
    let directory = FakeDirectory::new(DirectoryAnswer::Found(matching_metadata()));
    let p = pipeline(ValidationStage::disabled(), directory, FakeDispatcher::accepting());

    let report = p.lookup("s::receiver", "d::invoice").await.unwrap();
    assert!(report.success);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["participantID"], "s::receiver");
    assert_eq!(json["response"]["processes"][0]["processID"], "p::PR1");
}

#[tokio::test]
async fn lookup_not_found_and_failure() {
    let p = pipeline(
        ValidationStage::disabled(),
        FakeDirectory::new(DirectoryAnswer::NotFound),
        FakeDispatcher::accepting(),
    );
    let report = p.lookup("s::receiver", "d::invoice").await.unwrap();
    assert!(!report.success);
    assert!(report.response.is_none());
    assert!(report.error.is_none());

    let p = pipeline(
        ValidationStage::disabled(),
        FakeDirectory::new(DirectoryAnswer::Status(500)),
        FakeDispatcher::accepting(),
    );
    let report = p.lookup("s::receiver", "d::invoice").await.unwrap();
    assert!(!report.success);
    assert_eq!(report.error.unwrap().code.id(), "DD-001");
}

#[tokio::test]
async fn lookup_rejects_bad_identifiers_without_calling_directory() {
    let directory = FakeDirectory::new(DirectoryAnswer::NotFound);
    let p = pipeline(ValidationStage::disabled(), directory.clone(), FakeDispatcher::accepting());

    let err = p.lookup("bad", "d::invoice").await.unwrap_err();
    assert!(matches!(
        err,
        ParameterError::Identifier { field: "participantID", .. }
    ));
    assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
}
