//! Instructions sent to the generation service

use chrono::{DateTime, Utc};

pub const SEARCH_QUERY_PROMPT: &str = "Given a query, respond with the Google search query that would best help to answer the query. Don't use search operators. Respond with only the Google query and nothing else.";

pub const CONDENSE_PROMPT: &str =
    "Given text, respond with the summarized text (no more than 100 words) and nothing else.";

/// System instruction for the final answer, anchored at `now`
pub fn answer_prompt(now: &DateTime<Utc>) -> String {
    format!(
        "Generate a comprehensive and informative answer for a given question solely based on the provided web Search Results (URL and Summary). \
You must only use information from the provided search results. Use an unbiased and journalistic tone. \
Use this current date and time: {}. \
Combine search results together into a coherent answer. Do not repeat text. \
Cite search results using [${{number}}] notation, and don't link the citations. \
Only cite the most relevant results that answer the question accurately. \
If different results refer to different entities with the same name, write separate answers for each entity.",
        format_timestamp(now)
    )
}

/// e.g. `Monday, June 03, 2024 14:05:09 UTC`
pub fn format_timestamp(now: &DateTime<Utc>) -> String {
    now.format("%A, %B %d, %Y %H:%M:%S UTC").to_string()
}
