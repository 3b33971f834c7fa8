/// Format an error together with every underlying cause in its `source` chain
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    // Top level error
    writeln!(f, "{}\n", e)?;

    // Get source from top level error
    let mut current = e.source();

    // Loop through the whole chain of errors to find the underlying cause
    // of the failure that occurred
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
