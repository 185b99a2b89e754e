//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Colloquy Configuration
# Schema version 1
# Only override what you want to change -- missing sections use defaults.

[model]
name = "gemini-1.5-pro-latest"
backend = "google-ai"        # google-ai (GEMINI_API_KEY) or vertex-ai
                             # (GOOGLE_CLOUD_PROJECT, GOOGLE_CLOUD_REGION,
                             #  GOOGLE_ACCESS_TOKEN)

# A [generation] table replaces the defaults as a whole.
[generation]
temperature = 1.0            # 0.0-2.0
top_p = 0.95                 # 0.0-1.0
top_k = 64                   # >= 1
max_output_tokens = 8192     # >= 1
response_mime_type = "text/plain"
# stop_sequences = ["END"]

# [[safety]] entries replace the defaults as a whole.
# Categories: harassment, hate_speech, sexually_explicit, dangerous_content,
#             civic_integrity
# Thresholds: block_none, block_only_high, block_medium_and_above,
#             block_low_and_above, off, unspecified
[[safety]]
category = "harassment"
threshold = "block_medium_and_above"

[[safety]]
category = "hate_speech"
threshold = "block_medium_and_above"

[[safety]]
category = "sexually_explicit"
threshold = "block_medium_and_above"

[[safety]]
category = "dangerous_content"
threshold = "block_medium_and_above"

[session]
# title = "the SQL expert chatbot"
# message = "INSERT_INPUT_HERE"
# stream = false
# timeout_secs = 60
# show_history = true
#
# Seed conversation; leave unset for the built-in SQL assistant exchange,
# or set `seed = []` to start from an empty history.
# [[session.seed]]
# role = "user"
# parts = ["You are a PostgreSQL tuning assistant."]

[logging]
# level = "colloquy=info"
"##
}
