//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences and float formatting.

use invoice_core::{
    ApiError, Customer, CustomerInput, HttpMethod, HttpRequest, HttpResponse, Invoice,
    InvoiceClient, NewInvoice,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> InvoiceClient {
    InvoiceClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[test]
fn create_customer_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create_customer.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CustomerInput = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_customer(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let customer = c.parse_create_customer(simulated(&case)).unwrap();
        let expected: Customer = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(customer, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[test]
fn create_invoice_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create_invoice.json")) {
        let name = case["name"].as_str().unwrap();
        let input: NewInvoice = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_invoice(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let invoice = c.parse_create_invoice(simulated(&case)).unwrap();
        let expected: Invoice = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(invoice, expected, "{name}: parsed result");
        assert_eq!(invoice.items_total(), Some(invoice.total), "{name}: total matches items");
    }
}

#[test]
fn list_invoices_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list_invoices.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_list_invoices();
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}/invoices"), "{name}: path");
        assert!(req.body.is_none(), "{name}: no body");

        let invoices = c.parse_list_invoices(simulated(&case)).unwrap();
        let expected: Vec<Invoice> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(invoices, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/errors.json")) {
        let name = case["name"].as_str().unwrap();
        let response = simulated(&case);

        let err = match case["operation"].as_str().unwrap() {
            "get_customer" => c.parse_get_customer(response).map(drop),
            "list_customers" => c.parse_list_customers(response).map(drop),
            "delete_customer" => c.parse_delete_customer(response),
            "create_invoice" => c.parse_create_invoice(response).map(drop),
            "update_invoice" => c.parse_update_invoice(response).map(drop),
            other => panic!("unknown operation: {other}"),
        }
        .unwrap_err();

        match (case["expected_error"].as_str().unwrap(), err) {
            ("NotFound", ApiError::NotFound) => {}
            ("DeserializationError", ApiError::DeserializationError(_)) => {}
            ("HttpError", ApiError::HttpError { status, body }) => {
                assert_eq!(
                    u64::from(status),
                    case["expected_status"].as_u64().unwrap(),
                    "{name}: status"
                );
                assert_eq!(body, case["simulated_response"]["body"], "{name}: body kept");
            }
            (expected, actual) => panic!("{name}: expected {expected}, got {actual:?}"),
        }
    }
}
