//! Integration test: documents produced by `generate` pass `validate`
//! against the same schema file.

use jsonsmith_cli::generate::{run_generate, GenerateArgs};
use jsonsmith_cli::validate::{run_validate, ValidateArgs};

const ORDER_SCHEMA: &str = r#"
title: Order
type: object
properties:
  id: {type: string, format: uuid}
  placed: {type: string, format: date-time}
  paid: {type: boolean}
  quantity: {type: integer, minimum: 1, maximum: 9}
  lines:
    type: array
    minItems: 1
    items: {type: string, minLength: 1}
required: [id, placed, paid, quantity, lines]
"#;

#[test]
fn test_generated_documents_validate() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("order.schema.yaml");
    std::fs::write(&schema, ORDER_SCHEMA).unwrap();

    let mut out = Vec::new();
    let args = GenerateArgs {
        schema: schema.clone(),
        config: None,
        count: 5,
        seed: Some(2024),
        pretty: false,
    };
    assert_eq!(run_generate(&args, &mut out).unwrap(), 0);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 5);
    for (i, line) in text.lines().enumerate() {
        let document = dir.path().join(format!("order-{i}.json"));
        std::fs::write(&document, line).unwrap();

        let mut report = Vec::new();
        let code = run_validate(
            &ValidateArgs { schema: schema.clone(), document },
            &mut report,
        )
        .unwrap();
        assert_eq!(code, 0, "{}", String::from_utf8_lossy(&report));
    }
}
