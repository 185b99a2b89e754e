use std::io::{self, Write};

/// Print the welcome banner for the chatbot called `name`.
pub fn print_introduction(out: &mut dyn Write, name: &str) -> io::Result<()> {
    writeln!(out, "Welcome to {name}!")?;
    writeln!(
        out,
        "This client demonstrates a multi-turn chat session against the Gemini API."
    )?;
    writeln!(
        out,
        "Set GEMINI_API_KEY (google-ai) or GOOGLE_CLOUD_PROJECT, GOOGLE_CLOUD_REGION and"
    )?;
    writeln!(out, "GOOGLE_ACCESS_TOKEN (vertex-ai) before running it.")?;
    writeln!(out, "See the getting started guide for more information:")?;
    writeln!(out, "https://ai.google.dev/gemini-api/docs/get-started\n")?;
    Ok(())
}
