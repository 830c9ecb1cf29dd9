use arch::word::{Word, MEMORY_BASE, MEMORY_SIZE};

use crate::error::ErrorKind;

/// Code and data words of one translation unit with their write cursors.
#[derive(Debug, Clone, Default)]
pub struct Image {
    code: Vec<Word>,
    data: Vec<Word>,
    ic: usize,
    dc: usize,
}

impl Image {
    pub fn new() -> Self {
        Image::default()
    }

    fn reserve(&self, words: usize) -> Result<(), ErrorKind> {
        if self.code.len() + self.data.len() + words > MEMORY_SIZE {
            Err(ErrorKind::MemoryOverflow)
        } else {
            Ok(())
        }
    }

    /// Append an instruction's first word followed by zeroed slots for its
    /// operand words, which the second pass fills in.
    pub fn push_instruction(&mut self, first: Word, operand_words: u16) -> Result<(), ErrorKind> {
        let operand_words = operand_words as usize;
        self.reserve(1 + operand_words)?;
        self.code.push(first);
        self.code
            .extend(std::iter::repeat(Word::ZERO).take(operand_words));
        self.ic += 1 + operand_words;
        Ok(())
    }

    pub fn push_data(&mut self, words: &[Word]) -> Result<(), ErrorKind> {
        self.reserve(words.len())?;
        self.data.extend_from_slice(words);
        self.dc += words.len();
        Ok(())
    }

    /// Start re-walking the code image from its first word.
    pub fn rewind(&mut self) {
        self.ic = 0;
    }

    /// Step over a word emitted by the first pass.
    pub fn skip(&mut self) {
        self.ic += 1;
    }

    /// Fill the slot under the cursor and advance.
    pub fn put(&mut self, word: Word) {
        if let Some(slot) = self.code.get_mut(self.ic) {
            *slot = word;
        }
        self.ic += 1;
    }

    pub fn ic(&self) -> usize {
        self.ic
    }

    pub fn dc(&self) -> usize {
        self.dc
    }

    /// Machine address of the code word under the cursor.
    pub fn address(&self) -> u16 {
        self.ic as u16 + MEMORY_BASE
    }

    pub fn code(&self) -> &[Word] {
        &self.code
    }

    pub fn data(&self) -> &[Word] {
        &self.data
    }

    /// Code words followed by data words, with their machine addresses.
    pub fn words(&self) -> impl Iterator<Item = (u16, Word)> + '_ {
        self.code
            .iter()
            .chain(self.data.iter())
            .enumerate()
            .map(|(idx, word)| (idx as u16 + MEMORY_BASE, *word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors_advance() {
        let mut image = Image::new();
        image.push_instruction(Word::new(1), 2).unwrap();
        image.push_instruction(Word::new(2), 0).unwrap();
        image.push_data(&[Word::new(7), Word::new(8)]).unwrap();
        assert_eq!(image.ic(), 4);
        assert_eq!(image.dc(), 2);
        assert_eq!(image.code(), &[Word::new(1), Word::ZERO, Word::ZERO, Word::new(2)]);

        image.rewind();
        image.skip();
        assert_eq!(image.address(), 101);
        image.put(Word::new(5));
        image.put(Word::new(6));
        image.skip();
        assert_eq!(image.ic(), 4);
        assert_eq!(image.code()[1..3], [Word::new(5), Word::new(6)]);

        let addrs: Vec<_> = image.words().map(|(addr, _)| addr).collect();
        assert_eq!(addrs, vec![100, 101, 102, 103, 104, 105]);
    }

    #[test]
    fn capacity_is_shared() {
        let mut image = Image::new();
        image.push_data(&vec![Word::ZERO; MEMORY_SIZE - 1]).unwrap();
        assert_eq!(image.push_instruction(Word::ZERO, 1), Err(ErrorKind::MemoryOverflow));
        image.push_instruction(Word::ZERO, 0).unwrap();
        assert_eq!(image.push_data(&[Word::ZERO]), Err(ErrorKind::MemoryOverflow));
    }
}
