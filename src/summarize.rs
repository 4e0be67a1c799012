/// Produce the summary shown for a transcript.
///
/// No condensing happens yet: the summary is the transcript text itself.
pub fn summarize(text: &str) -> String {
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_transcript() {
        assert_eq!(summarize("Never gonna give"), "Never gonna give");
    }

    #[test]
    fn test_summary_of_empty_text() {
        assert_eq!(summarize(""), "");
    }
}
