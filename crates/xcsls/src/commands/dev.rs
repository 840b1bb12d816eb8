use anyhow::bail;
use anyhow::Result;
use xcsls_compiler::transform_source;
use xcsls_markup::GeneratorConfig;

const SAMPLES: &[&str] = &[
    "class C { var e = (<div/>); }",
    "var e = (<btn onclick={H}/>);",
    "var e = (<div>hello<span/></div>);",
    "var e = (<ul>{xs.Map(x => <li/>)}</ul>);",
    "namespace N { class C { void M() { var x = 1 < 2; } } }",
];

/// In-memory self-test: run the samples through the core and check the
/// universal source-map invariants.
pub fn run() -> Result<()> {
    let generator = GeneratorConfig::default();

    for sample in SAMPLES {
        let (content, map) = transform_source(sample, &generator);

        if !map.covers_transformed_range(content.len()) {
            bail!("coverage hole for sample: {sample}");
        }

        let entries = map.entries();
        for pair in entries.windows(2) {
            if pair[0].transformed_start > pair[1].transformed_start {
                bail!("unordered map entries for sample: {sample}");
            }
        }

        for offset in 0..=content.len() {
            if map.resolve(u32::try_from(offset)?).is_none() {
                bail!("unresolvable offset {offset} for sample: {sample}");
            }
        }

        for entry in entries.iter().filter(|e| e.is_identity()) {
            let original = &sample[entry.original_start as usize..entry.original_end as usize];
            let transformed =
                &content[entry.transformed_start as usize..entry.transformed_end as usize];
            if original != transformed {
                bail!("identity entry mismatch for sample: {sample}");
            }
        }
    }

    // Pure host text must come back byte-identical.
    let pure = SAMPLES[4];
    let (content, map) = transform_source(pure, &GeneratorConfig::default());
    if content != pure || map.len() != 1 {
        bail!("pure host sample was not an identity transform");
    }

    tracing::info!(samples = SAMPLES.len(), "self-test passed");
    println!("self-test passed ({} samples)", SAMPLES.len());
    Ok(())
}
