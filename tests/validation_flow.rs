//! Handler integration tests: schema validation and sanitization flows.

use serde_json::{json, Value};

mod common;

fn field_messages(body: &Value, field: &str) -> Vec<String> {
    body["error"]["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter(|f| f["field"] == field)
                .map(|f| f["message"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn health_reports_ok() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();

    let res = client.get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    shutdown.trigger();
}

#[tokio::test]
async fn invalid_review_lists_every_failed_field() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let mut review = common::valid_review();
    review["accommodationId"] = json!("not-a-uuid");
    review["title"] = json!("short");
    review["text"] = json!("too short");
    review["rating"] = json!(9);

    let res = client
        .post(format!("{base}/api/reviews"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    for field in ["accommodationId", "title", "text", "rating"] {
        assert!(
            !field_messages(&body, field).is_empty(),
            "expected a failure for {field}: {body}"
        );
    }

    shutdown.trigger();
}

#[tokio::test]
async fn review_with_script_payload_is_rejected() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let mut review = common::valid_review();
    review["text"] = json!(format!(
        "{}<script>document.cookie</script>",
        "Decent place close to the station and shops. ".repeat(2)
    ));

    let res = client
        .post(format!("{base}/api/reviews"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        field_messages(&body, "text"),
        vec!["Review contains invalid content"]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn accepted_review_is_echoed_sanitized() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let mut review = common::valid_review();
    // <div> passes the schema (not script-bearing) but is outside the
    // review markup policy; <strong> is inside it.
    review["title"] = json!("<em>Great</em> spot near campus");
    review["text"] = json!(
        "<div><p>Close to campus and <strong>well managed</strong>.</p></div> \
         Stayed two semesters and would happily recommend the building."
    );

    let res = client
        .post(format!("{base}/api/reviews"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let body: Value = res.json().await.unwrap();
    let echoed = &body["review"];
    assert_eq!(echoed["title"], "Great spot near campus");
    let text = echoed["text"].as_str().unwrap();
    assert!(!text.contains("<div>"));
    assert!(text.contains("<p>") && text.contains("<strong>"));

    shutdown.trigger();
}

#[tokio::test]
async fn registration_password_mismatch_lands_on_confirm_password() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let mut registration = common::valid_registration();
    registration["confirmPassword"] = json!("Different1!");

    let res = client
        .post(format!("{base}/api/auth/register"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        field_messages(&body, "confirmPassword"),
        vec!["Passwords don't match"]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn registration_rejects_non_university_email() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let mut registration = common::valid_registration();
    registration["email"] = json!("x@gmail.com");

    let res = client
        .post(format!("{base}/api/auth/register"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&registration)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert!(!field_messages(&body, "email").is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn registration_accepts_and_normalizes() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let res = client
        .post(format!("{base}/api/auth/register"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&common::valid_registration())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "z1234567@student.unsw.edu.au");
    assert_eq!(body["university"], "UNSW");

    shutdown.trigger();
}

#[tokio::test]
async fn search_sanitizes_before_validating() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();

    // Quotes and semicolons are removed by sanitization; the cleaned
    // string still trips the SQL keyword check and is rejected.
    let res = client
        .get(format!("{base}/api/search"))
        .query(&[("q", "Robert'; DROP TABLE reviews;--")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(field_messages(&body, "q"), vec!["Invalid search query"]);

    // Markup is stripped rather than rejected.
    let res = client
        .get(format!("{base}/api/search"))
        .query(&[("q", "<b>near UNSW</b>")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["query"], "bnear UNSW/b");

    shutdown.trigger();
}

#[tokio::test]
async fn search_requires_a_query() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();

    let res = client.get(format!("{base}/api/search")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(field_messages(&body, "q"), vec!["Search query is required"]);

    shutdown.trigger();
}

#[tokio::test]
async fn login_validates_shape() {
    let (base, shutdown) = common::spawn_app(common::test_config()).await;
    let client = common::client();
    let (cookie, token) = common::fetch_csrf(&client, &base).await;

    let res = client
        .post(format!("{base}/api/auth/login"))
        .header("cookie", cookie.clone())
        .header("x-csrf-token", token.clone())
        .json(&json!({ "email": "z1234567@student.unsw.edu.au", "password": "hunter2!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(format!("{base}/api/auth/login"))
        .header("cookie", cookie)
        .header("x-csrf-token", token)
        .json(&json!({ "email": "z1234567@student.unsw.edu.au", "password": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(field_messages(&body, "password"), vec!["Password is required"]);

    shutdown.trigger();
}
