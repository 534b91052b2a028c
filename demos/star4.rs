fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // usage: star4 [width] [height] [adj]
    let args: Vec<f64> = std::env::args()
        .skip(1)
        .map(|a| {
            a.parse()
                .map_err(|e| miette::miette!("bad number `{a}`: {e}"))
        })
        .collect::<Result<_, _>>()?;
    let width = args.first().copied().unwrap_or(200.0);
    let height = args.get(1).copied().unwrap_or(200.0);

    let bbox = prstgeom::BoundingBox::try_new(0.0, 0.0, width, height)
        .map_err(|e| miette::miette!("{e}"))?;
    let mut shape =
        prstgeom::ShapeInstance::from_registry(prstgeom::PresetRegistry::builtin(), "star4", bbox)?;
    if let Some(&adj) = args.get(2) {
        shape.set_adjustment("adj", adj)?;
    }

    let geometry = shape.geometry();
    println!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}">"#);
    println!(
        r#"  <path d="{}" fill="none" stroke="black"/>"#,
        geometry.outline.to_svg_path_data()
    );
    for handle in &geometry.handles {
        println!(
            r#"  <circle cx="{}" cy="{}" r="3" fill="orange"/>"#,
            handle.position.x, handle.position.y
        );
    }
    println!("</svg>");
    Ok(())
}
