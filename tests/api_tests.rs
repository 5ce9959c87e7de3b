//! API integration tests
//!
//! Require a running server with an empty database.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Each test works on its own ISBN so runs do not interfere.
fn unique_isbn(tag: &str) -> String {
    format!(
        "{}-{}",
        tag,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

async fn create_book(client: &Client, isbn: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "As aventuras",
            "author": "Artur",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_create_book() {
    let client = Client::new();
    let isbn = unique_isbn("create");

    let body = create_book(&client, &isbn).await;
    assert!(body["id"].is_number());
    assert_eq!(body["title"], "As aventuras");
    assert_eq!(body["author"], "Artur");
    assert_eq!(body["isbn"], isbn);
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_duplicate_isbn() {
    let client = Client::new();
    let isbn = unique_isbn("dup");

    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Outro título",
            "author": "Outro autor",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0], "Isbn já cadastrado.");
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_empty_body() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "",
            "author": "",
            "isbn": ""
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_book_keeps_isbn() {
    let client = Client::new();
    let isbn = unique_isbn("update");

    let book = create_book(&client, &isbn).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({
            "title": "Título atualizado",
            "author": "Autor atualizado"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Título atualizado");
    assert_eq!(body["author"], "Autor atualizado");
    assert_eq!(body["isbn"], isbn);
}

#[tokio::test]
#[ignore]
async fn test_delete_book() {
    let client = Client::new();
    let isbn = unique_isbn("delete");

    let book = create_book(&client, &isbn).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_books_by_title() {
    let client = Client::new();
    let isbn = unique_isbn("list");
    create_book(&client, &isbn).await;

    let response = client
        .get(format!("{}/books?isbn={}&page=1&per_page=10", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["items"][0]["isbn"], isbn);
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination_is_clamped() {
    let client = Client::new();
    let isbn = unique_isbn("clamp");
    create_book(&client, &isbn).await;

    // Oversized per_page is capped; metadata echoes the effective value.
    let response = client
        .get(format!("{}/books?per_page=1000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["per_page"], 100);

    // A page number at the far end of the i64 range is served (empty), not
    // an error.
    let response = client
        .get(format!(
            "{}/books?page={}&per_page=100",
            BASE_URL,
            i64::MAX
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_create_loan_for_unknown_isbn() {
    let client = Client::new();

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "isbn": unique_isbn("missing"),
            "customer": "Fulano",
            "customer_email": "fulano@email.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0], "Livro não encontrado para o isbn informado.");
}

#[tokio::test]
#[ignore]
async fn test_loaned_book_cannot_be_loaned_again() {
    let client = Client::new();
    let isbn = unique_isbn("twice");
    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Ciclano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0], "Livro já emprestado.");
}

#[tokio::test]
#[ignore]
async fn test_returned_book_can_be_loaned_again() {
    let client = Client::new();
    let isbn = unique_isbn("again");
    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let loan_id: i64 = response.json().await.expect("Failed to parse loan id");

    // Mark the first loan returned
    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // A second loan for the same book is now allowed
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Ciclano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_reactivating_loan_conflicts_with_newer_loan() {
    let client = Client::new();
    let isbn = unique_isbn("react");
    create_book(&client, &isbn).await;

    // First loan, then returned
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let first_loan_id: i64 = response.json().await.expect("Failed to parse loan id");

    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, first_loan_id))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // Second loan takes the book
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Ciclano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // Flipping the first loan back to active would mean two active loans
    // for the same book: rejected as a business rule, not a server error.
    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, first_loan_id))
        .json(&json!({ "returned": false }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0], "Livro já emprestado.");
}

#[tokio::test]
#[ignore]
async fn test_reactivating_loan_without_conflict_succeeds() {
    let client = Client::new();
    let isbn = unique_isbn("undo");
    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let loan_id: i64 = response.json().await.expect("Failed to parse loan id");

    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // Nobody else has the book: undoing the return is allowed.
    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({ "returned": false }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_return_unknown_loan() {
    let client = Client::new();

    let response = client
        .patch(format!("{}/loans/999999999", BASE_URL))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_loans_by_isbn() {
    let client = Client::new();
    let isbn = unique_isbn("filter");
    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/loans?isbn={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["customer"], "Fulano");
    assert_eq!(body["items"][0]["book"]["isbn"], isbn);
}

#[tokio::test]
#[ignore]
async fn test_loans_by_book() {
    let client = Client::new();
    let isbn = unique_isbn("bybook");
    let book = create_book(&client, &isbn).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/books/{}/loans", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["book"]["id"], book_id);
}

#[tokio::test]
#[ignore]
async fn test_book_with_loans_cannot_be_deleted() {
    let client = Client::new();
    let isbn = unique_isbn("guard");
    let book = create_book(&client, &isbn).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0], "Livro possui empréstimos registrados.");
}

#[tokio::test]
#[ignore]
async fn test_returned_loan_is_not_late() {
    let client = Client::new();
    let isbn = unique_isbn("late");
    create_book(&client, &isbn).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "Fulano" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let loan_id: i64 = response.json().await.expect("Failed to parse loan id");

    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/loans/late", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let late = body.as_array().expect("Expected a list");
    assert!(late.iter().all(|l| l["id"].as_i64() != Some(loan_id)));
}
