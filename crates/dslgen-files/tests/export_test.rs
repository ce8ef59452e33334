//! Generated code through the output tree onto disk.

use dslgen_codegen::{Pipeline, SourceUnit};
use dslgen_core::{GenerationMode, MarkerConvention, ZeroInjectedPolicy};
use dslgen_files::{ExportOptions, OutputBuilder};
use std::fs;
use tempfile::TempDir;

const CARD: &str = r#"
package com.example.ui

import com.vaadin.flow.component.html.Div

@GenDsl
class Card(@GenDslInject private val service: CardService, val title: String = "Untitled") : Div()
"#;

fn generate() -> dslgen_codegen::GenerationOutput {
    Pipeline::new(
        GenerationMode::Spring,
        ZeroInjectedPolicy::AlwaysFactory,
        MarkerConvention::MarkToInject,
    )
    .unwrap()
    .run_sources(&[SourceUnit::new("Card.kt", CARD)])
    .unwrap()
}

#[test]
fn test_export_generated_factory() {
    let output = generate();
    let tree = OutputBuilder::from_generated_code(&output.code).build().unwrap();
    let temp = TempDir::new().unwrap();

    let written = tree.export(temp.path(), &ExportOptions::default()).unwrap();
    assert_eq!(written, 1);

    let content = fs::read_to_string(temp.path().join("com/example/ui/CardFactory.kt")).unwrap();
    assert!(content.starts_with("package com.example.ui\n"));
    assert!(content.contains("class CardFactory("));
    assert!(content.contains("fun HasComponents.card("));
}

#[test]
fn test_second_pass_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("com/example/ui/CardFactory.kt");

    let first = OutputBuilder::from_generated_code(&generate().code).build().unwrap();
    first.export(temp.path(), &ExportOptions::default()).unwrap();
    let before = fs::read(&path).unwrap();

    let second = OutputBuilder::from_generated_code(&generate().code).build().unwrap();
    second
        .export(temp.path(), &ExportOptions::default().with_clean(true))
        .unwrap();

    assert_eq!(before, fs::read(&path).unwrap());
}
