//! End-to-end scenarios through the full core: locate, weave, map,
//! translate. Generated whitespace is never asserted; comparisons squash
//! it away.

use camino::Utf8PathBuf;
use xcsls_compiler::transform_source;
use xcsls_compiler::translate;
use xcsls_compiler::CompilerDiagnostic;
use xcsls_compiler::Severity;
use xcsls_markup::GeneratorConfig;
use xcsls_source::SourceMap;

fn config() -> GeneratorConfig {
    GeneratorConfig::default()
}

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn assert_total_coverage(map: &SourceMap, transformed_len: usize) {
    assert!(
        map.covers_transformed_range(transformed_len),
        "derived bytes not fully covered by map"
    );
}

#[test]
fn scenario_plain_element() {
    let source = "class C { var e = (<div/>); }";
    let (content, map) = transform_source(source, &config());
    assert_eq!(
        squash(&content),
        r#"classC{vare=(Document.CreateElement("div",newDivProps()));}"#
    );

    // A tag-name entry maps `div` onto the emitted `"div"`.
    let entry = map
        .entries()
        .iter()
        .find(|e| &source[e.original_start as usize..e.original_end as usize] == "div")
        .expect("tag-name entry");
    let transformed = &content[entry.transformed_start as usize..entry.transformed_end as usize];
    assert_eq!(transformed, "\"div\"");

    assert_total_coverage(&map, content.len());
}

#[test]
fn scenario_expression_attribute() {
    let source = "var e = (<btn onclick={H}/>);";
    let (content, map) = transform_source(source, &config());
    assert_eq!(
        squash(&content),
        r#"vare=(Document.CreateElement("btn",newBtnProps{Onclick=H}));"#
    );

    let entry = map
        .entries()
        .iter()
        .find(|e| &source[e.original_start as usize..e.original_end as usize] == "H")
        .expect("attribute value entry");
    let transformed = &content[entry.transformed_start as usize..entry.transformed_end as usize];
    assert_eq!(transformed, "H");

    assert_total_coverage(&map, content.len());
}

#[test]
fn scenario_nested_children() {
    let source = "var e = (<div>hello<span/></div>);";
    let (content, map) = transform_source(source, &config());
    assert_eq!(
        squash(&content),
        r#"vare=(Document.CreateElement("div",newDivProps(),"hello",Document.CreateElement("span",newSpanProps())));"#
    );
    assert_total_coverage(&map, content.len());
}

#[test]
fn scenario_lambda_with_nested_markup() {
    let source = "var e = (<ul>{xs.Map(x => <li/>)}</ul>);";
    let (content, map) = transform_source(source, &config());
    assert_eq!(
        squash(&content),
        r#"vare=(Document.CreateElement("ul",newUlProps(),xs.Map(x=>(Document.CreateElement("li",newLiProps())))));"#
    );

    // The ul, the lambda head and the nested li are all mapped.
    let covered: Vec<&str> = map
        .entries()
        .iter()
        .map(|e| &source[e.original_start as usize..e.original_end as usize])
        .collect();
    assert!(covered.contains(&"ul"));
    assert!(covered.contains(&"li"));
    assert!(covered.iter().any(|text| text.starts_with("xs.Map(x =>")));

    assert_total_coverage(&map, content.len());
}

#[test]
fn scenario_diagnostic_projects_to_attribute_value() {
    let source = "var e = (<btn onclick={H}/>);";
    let (content, map) = transform_source(source, &config());
    let value_pos = content.find("Onclick = H").unwrap() + "Onclick = ".len();

    let diagnostic = CompilerDiagnostic {
        file: Utf8PathBuf::from("Generated/a.cs"),
        start: u32::try_from(value_pos).unwrap(),
        length: 1,
        code: "CS0103".to_string(),
        severity: Severity::Error,
        message: "The name 'H' does not exist".to_string(),
    };
    let translated = translate(&diagnostic, &map, &content, source).unwrap();
    let projected = &source[translated.span.start_usize()..translated.span.end_usize()];
    assert_eq!(projected, "H");
}

#[test]
fn idempotent_on_pure_host() {
    let source = "namespace N { class C { void M() { var x = 1 < 2; } } }";
    let (content, map) = transform_source(source, &config());
    assert_eq!(content, source);
    assert_eq!(map.len(), 1);
    assert!(map.entries()[0].is_identity());
}

#[test]
fn reverse_projection_defined_everywhere() {
    let source = "var e = (<div>hello<span/></div>); var f = (<p/>);";
    let (content, map) = transform_source(source, &config());
    for offset in 0..=content.len() {
        let entry = map.resolve(u32::try_from(offset).unwrap());
        assert!(entry.is_some(), "no entry resolves offset {offset}");
    }
}

#[test]
fn monotone_ordering_of_entries() {
    let source = "var e = (<div>hello<span/></div>); var f = (<p/>);";
    let (content, map) = transform_source(source, &config());
    let entries = map.entries();
    for pair in entries.windows(2) {
        assert!(pair[0].transformed_start <= pair[1].transformed_start);
    }
    assert_total_coverage(&map, content.len());
}

#[test]
fn identity_bytes_recoverable() {
    let source = "int before; var e = (<div/>); int after;";
    let (content, map) = transform_source(source, &config());

    // Every byte outside the region appears in the derived text at an
    // offset recoverable from an identity entry.
    for entry in map.entries().iter().filter(|e| e.is_identity()) {
        let original = &source[entry.original_start as usize..entry.original_end as usize];
        let transformed =
            &content[entry.transformed_start as usize..entry.transformed_end as usize];
        assert_eq!(original, transformed);
    }
}

#[test]
fn multiple_files_of_regions_weave_independently() {
    let source = "var a = (<p/>);\nvar b = (<q attr=\"v\"/>);\n";
    let (content, map) = transform_source(source, &config());
    assert!(squash(&content).contains(r#"Document.CreateElement("p",newPProps())"#));
    assert!(squash(&content).contains(r#"Document.CreateElement("q",newQProps{Attr="v"})"#));
    assert_total_coverage(&map, content.len());
}
