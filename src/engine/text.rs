/// The accumulated transcript: the sentence, the word being spelled, and the
/// letter currently offered by the classifier.
///
/// `word` is kept equal to the trailing run of non-space characters of
/// `sentence`, so deletes that cross a space boundary reopen the previous
/// word instead of desynchronizing the two buffers.
#[derive(Debug, Default)]
pub struct TextBuffer {
    letter: Option<char>,
    word: String,
    sentence: String,
}

impl TextBuffer {
    /// Appends the current letter to both buffers. Returns the committed
    /// letter, or None when no letter was pending.
    pub fn commit_letter(&mut self) -> Option<char> {
        let letter = self.letter?;
        self.word.push(letter);
        self.sentence.push(letter);
        Some(letter)
    }

    /// Removes the last character of the sentence, if any, and re-derives
    /// the current word from what remains.
    pub fn delete_last(&mut self) -> Option<char> {
        let removed = self.sentence.pop();
        self.word = self
            .sentence
            .rsplit(' ')
            .next()
            .unwrap_or("")
            .to_string();
        removed
    }

    pub fn insert_space(&mut self) {
        self.sentence.push(' ');
        self.word.clear();
    }

    pub fn clear(&mut self) {
        self.letter = None;
        self.word.clear();
        self.sentence.clear();
    }

    /// The classifier offer is sticky: it is replaced by newer confident
    /// predictions and survives commits unchanged.
    pub fn set_letter(&mut self, letter: char) {
        self.letter = Some(letter);
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(sentence: &str) -> TextBuffer {
        let mut buffer = TextBuffer::default();
        for ch in sentence.chars() {
            if ch == ' ' {
                buffer.insert_space();
            } else {
                buffer.set_letter(ch);
                buffer.commit_letter();
            }
        }
        buffer
    }

    #[test]
    fn commit_appends_to_word_and_sentence() {
        let mut buffer = TextBuffer::default();
        buffer.set_letter('H');
        assert_eq!(buffer.commit_letter(), Some('H'));
        buffer.set_letter('I');
        assert_eq!(buffer.commit_letter(), Some('I'));
        assert_eq!(buffer.word(), "HI");
        assert_eq!(buffer.sentence(), "HI");
    }

    #[test]
    fn commit_without_pending_letter_is_a_no_op() {
        let mut buffer = TextBuffer::default();
        assert_eq!(buffer.commit_letter(), None);
        assert_eq!(buffer.sentence(), "");
    }

    #[test]
    fn committed_letter_stays_offered() {
        let mut buffer = TextBuffer::default();
        buffer.set_letter('A');
        buffer.commit_letter();
        assert_eq!(buffer.letter(), Some('A'));
        assert_eq!(buffer.commit_letter(), Some('A'), "a held offer can be committed again");
        assert_eq!(buffer.sentence(), "AA");
    }

    #[test]
    fn space_appends_one_space_and_resets_word() {
        let mut buffer = buffer_with("AB");
        buffer.insert_space();
        assert_eq!(buffer.sentence(), "AB ");
        assert_eq!(buffer.word(), "");
    }

    #[test]
    fn delete_pops_sentence_and_word_together() {
        let mut buffer = buffer_with("AB CD");
        assert_eq!(buffer.delete_last(), Some('D'));
        assert_eq!(buffer.sentence(), "AB C");
        assert_eq!(buffer.word(), "C");
    }

    #[test]
    fn delete_through_a_space_reopens_the_previous_word() {
        let mut buffer = buffer_with("AB ");
        assert_eq!(buffer.word(), "");
        assert_eq!(buffer.delete_last(), Some(' '));
        assert_eq!(buffer.sentence(), "AB");
        assert_eq!(buffer.word(), "AB");
    }

    #[test]
    fn delete_on_empty_buffers_is_a_no_op() {
        let mut buffer = TextBuffer::default();
        assert_eq!(buffer.delete_last(), None);
        assert_eq!(buffer.sentence(), "");
        assert_eq!(buffer.word(), "");
    }

    #[test]
    fn clear_resets_everything() {
        let mut buffer = buffer_with("AB CD");
        buffer.set_letter('E');
        buffer.clear();
        assert_eq!(buffer.sentence(), "");
        assert_eq!(buffer.word(), "");
        assert_eq!(buffer.letter(), None);
    }

    #[test]
    fn word_tracks_trailing_segment_across_mixed_edits() {
        let mut buffer = buffer_with("HI YO");
        buffer.delete_last();
        buffer.delete_last();
        buffer.delete_last();
        assert_eq!(buffer.sentence(), "HI");
        assert_eq!(buffer.word(), "HI");
        buffer.set_letter('X');
        buffer.commit_letter();
        assert_eq!(buffer.word(), "HIX");
        assert_eq!(buffer.sentence(), "HIX");
    }
}
