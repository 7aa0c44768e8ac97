//! The static alphabet deck.

/// One flashcard: an animal emoji, its initial letter, and the animal's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    emoji: &'static str,
    letter: char,
    label: &'static str,
}

impl Card {
    const fn new(emoji: &'static str, letter: char, label: &'static str) -> Self {
        Self {
            emoji,
            letter,
            label,
        }
    }

    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        self.emoji
    }

    #[must_use]
    pub const fn letter(&self) -> char {
        self.letter
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Zero-based position of the letter in the alphabet (`A` = 0).
    #[must_use]
    pub fn letter_offset(&self) -> u32 {
        u32::from(self.letter).saturating_sub(u32::from('A'))
    }
}

pub const DECK: [Card; 26] = [
    Card::new("🐊", 'A', "Alligator"),
    Card::new("🐻", 'B', "Bear"),
    Card::new("🐱", 'C', "Cat"),
    Card::new("🐕", 'D', "Dog"),
    Card::new("🐘", 'E', "Elephant"),
    Card::new("🦊", 'F', "Fox"),
    Card::new("🦍", 'G', "Gorilla"),
    Card::new("🐴", 'H', "Horse"),
    Card::new("🦎", 'I', "Iguana"),
    Card::new("🐆", 'J', "Jaguar"),
    Card::new("🦘", 'K', "Kangaroo"),
    Card::new("🦙", 'L', "Llama"),
    Card::new("🐵", 'M', "Monkey"),
    Card::new("🦎", 'N', "Newt"),
    Card::new("🐦", 'O', "Ostrich"),
    Card::new("🐧", 'P', "Penguin"),
    Card::new("🐦", 'Q', "Quail"),
    Card::new("🦏", 'R', "Rhinoceros"),
    Card::new("🐍", 'S', "Snake"),
    Card::new("🐯", 'T', "Tiger"),
    Card::new("🐦", 'U', "Umbrella bird"),
    Card::new("🦅", 'V', "Vulture"),
    Card::new("🦘", 'W', "Wombat"),
    Card::new("🐿️", 'X', "Xerus"),
    Card::new("🐃", 'Y', "Yak"),
    Card::new("🦓", 'Z', "Zebra"),
];

/// Background colour assigned to a card position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl CardColor {
    pub const CYCLE: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
        Self::Pink,
    ];

    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}
