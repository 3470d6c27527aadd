use consultorio_email_contracts::{ContentType, Email, EmailSendError, EmailService};
use consultorio_email_impl::{ResendEmailServiceConfig, ResendEmailServiceImpl};
use consultorio_testing::resend::FakeResend;
use consultorio_utils::assert_matches;
use pretty_assertions::assert_eq;
use url::Url;

const API_KEY: &str = "re_test";

#[tokio::test]
async fn send_email() {
    let client = setup().await;

    let id = client
        .resend(API_KEY, "Contato Kelly Amorim <contato@kellyamorim.com.br>")
        .send(email())
        .await
        .unwrap();

    let outbox = client.fake.outbox().await;
    assert_eq!(outbox.len(), 1);
    let mail = &outbox[0];
    assert_eq!(*id, mail.id);
    assert!(mail.from.contains("Contato Kelly Amorim"));
    assert!(mail.from.ends_with("<contato@kellyamorim.com.br>"));
    assert_eq!(mail.to, ["kelly.amorim@kellyamorim.com.br"]);
    assert_eq!(mail.subject, "Nova mensagem do site: Contato");
    assert_eq!(mail.html.as_deref(), Some("<h1>Olá</h1>"));
    assert_eq!(mail.text, None);
    assert_eq!(mail.reply_to.as_deref(), Some("ana@example.com"));
}

#[tokio::test]
async fn send_text_email() {
    let client = setup().await;

    client
        .resend(API_KEY, "contato@kellyamorim.com.br")
        .send(Email {
            content_type: ContentType::Text,
            reply_to: None,
            ..email()
        })
        .await
        .unwrap();

    let outbox = client.fake.outbox().await;
    assert_eq!(outbox[0].html, None);
    assert_eq!(outbox[0].text.as_deref(), Some("<h1>Olá</h1>"));
    assert_eq!(outbox[0].reply_to, None);
}

#[tokio::test]
async fn send_twice_yields_distinct_ids() {
    let client = setup().await;
    let resend = client.resend(API_KEY, "contato@kellyamorim.com.br");

    let a = resend.send(email()).await.unwrap();
    let b = resend.send(email()).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(client.fake.outbox().await.len(), 2);
}

#[tokio::test]
async fn unverified_sender_is_rejected() {
    let client = setup().await;

    let result = client
        .resend(API_KEY, "contato@unverified.example")
        .send(email())
        .await;

    let error = assert_matches!(result, Err(EmailSendError::Rejected(error)) => error);
    assert_eq!(error.code, Some(403));
    assert_eq!(error.name.as_deref(), Some("validation_error"));
    assert!(error.message.contains("unverified.example"));
    assert!(client.fake.outbox().await.is_empty());
}

#[tokio::test]
async fn transport_failure() {
    // nothing listens on the discard port
    let resend = ResendEmailServiceImpl::new(ResendEmailServiceConfig {
        endpoint: "http://127.0.0.1:9/".parse().unwrap(),
        api_key: API_KEY.into(),
        from: "contato@kellyamorim.com.br".parse().unwrap(),
    })
    .unwrap();

    let result = resend.send(email()).await;

    assert_matches!(result, Err(EmailSendError::Other(_)));
}

#[tokio::test]
async fn ping() {
    let client = setup().await;

    client
        .resend(API_KEY, "contato@kellyamorim.com.br")
        .ping()
        .await
        .unwrap();
    client
        .resend("re_wrong", "contato@kellyamorim.com.br")
        .ping()
        .await
        .unwrap_err();
}

#[test]
fn empty_api_key() {
    let result = ResendEmailServiceImpl::new(ResendEmailServiceConfig {
        endpoint: "https://api.resend.com/".parse().unwrap(),
        api_key: String::new(),
        from: "contato@kellyamorim.com.br".parse().unwrap(),
    });

    assert!(result.is_err());
}

struct TestClient {
    fake: FakeResend,
    endpoint: Url,
}

impl TestClient {
    fn resend(&self, api_key: &str, from: &str) -> ResendEmailServiceImpl {
        ResendEmailServiceImpl::new(ResendEmailServiceConfig {
            endpoint: self.endpoint.clone(),
            api_key: api_key.into(),
            from: from.parse().unwrap(),
        })
        .unwrap()
    }
}

async fn setup() -> TestClient {
    let fake = FakeResend::new(API_KEY);
    let endpoint = fake.clone().spawn().await.unwrap();
    TestClient { fake, endpoint }
}

fn email() -> Email {
    Email {
        recipient: "kelly.amorim@kellyamorim.com.br".parse().unwrap(),
        subject: "Nova mensagem do site: Contato".into(),
        body: "<h1>Olá</h1>".into(),
        content_type: ContentType::Html,
        reply_to: Some("ana@example.com".parse().unwrap()),
    }
}
