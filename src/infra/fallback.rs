//! Pre-written greetings and verses used when Gemini cannot answer.
//!
//! Each pool rotates independently: consuming from one never moves
//! another's cursor.

use crate::domain::{GreetingVoice, LanguagePreference};

/// Verse entries use the same `"<reference>|<text>"` shape the model returns.
pub const ENGLISH_VERSES: &[&str] = &[
    "Luke 2:10-11|Fear not, for behold, I bring you good news of great joy that will be for all the people. For unto you is born this day in the city of David a Savior, who is Christ the Lord.",
    "Isaiah 9:6|For to us a child is born, to us a son is given; and the government shall be upon his shoulder, and his name shall be called Wonderful Counselor, Mighty God, Everlasting Father, Prince of Peace.",
    "Matthew 1:23|Behold, the virgin shall conceive and bear a son, and they shall call his name Immanuel, which means, God with us.",
    "Luke 2:14|Glory to God in the highest, and on earth peace among those with whom he is pleased!",
    "John 1:14|And the Word became flesh and dwelt among us, and we have seen his glory, glory as of the only Son from the Father, full of grace and truth.",
    "Micah 5:2|But you, O Bethlehem Ephrathah, who are too little to be among the clans of Judah, from you shall come forth for me one who is to be ruler in Israel.",
];

pub const AMHARIC_VERSES: &[&str] = &[
    "ሉቃስ 2:10-11|አትፍሩ፤ እነሆ፥ ለሕዝቡ ሁሉ የሚሆን ታላቅ ደስታ አበስራችኋለሁና፤ ዛሬ በዳዊት ከተማ መድኃኒት እርሱም ክርስቶስ ጌታ የሆነ ተወልዶላችኋልና።",
    "ኢሳይያስ 9:6|ሕፃን ተወልዶልናልና፥ ወንድ ልጅም ተሰጥቶናልና፤ አለቅነትም በጫንቃው ላይ ይሆናል፤ ስሙም ድንቅ መካር፥ ኃያል አምላክ፥ የዘላለም አባት፥ የሰላም አለቃ ተብሎ ይጠራል።",
    "ማቴዎስ 1:23|እነሆ፥ ድንግል ትፀንሳለች ወንድ ልጅም ትወልዳለች፥ ስሙንም አማኑኤል ይሉታል፤ ትርጓሜውም እግዚአብሔር ከእኛ ጋር የሚል ነው።",
    "ሉቃስ 2:14|ክብር ለእግዚአብሔር በአርያም ይሁን፤ በምድርም ሰላም ለሰው በጎ ፈቃድ።",
    "ዮሐንስ 1:14|ቃልም ሥጋ ሆነ፤ ጸጋንና እውነትንም ተመልቶ በእኛ አደረ፥ አንድ ልጅም ከአባቱ ዘንድ እንዳለው ክብር የሆነው ክብሩን አየን።",
];

pub const ENGLISH_GREETINGS: &[&str] = &[
    "Melkam Gena! May the light of the Nativity fill your home with peace, your table with injera and laughter, and your heart with the joy of the newborn King.",
    "Wishing you a blessed Gena: warm candlelight, the aroma of fresh buna, and the company of everyone you love gathered close.",
    "As the bells ring out on Gena morning, may hope and gladness walk with you into the new season. Melkam Gena!",
    "May this Christmas bring you the quiet joy of the shepherds and the bright wonder of the star over Bethlehem. Melkam Gena!",
    "Sending you love for Gena: may your coffee ceremony be long, your blessings many, and your year ahead full of grace.",
];

/// Polite second person (እርስዎ), safe for any recipient.
pub const AMHARIC_GREETINGS: &[&str] = &[
    "እንኳን ለብርሃነ ልደቱ በሰላም አደረሰዎ! የገና በዓል ለእርስዎና ለቤተሰብዎ የሰላም፣ የፍቅርና የበረከት ይሁን።",
    "መልካም ገና! የቡና ሥርዓቱ ሞቅታና የሻማው ብርሃን ቤትዎን በደስታ ይሙላው።",
    "በዚህ የገና በዓል የጌታችን ልደት ተስፋና ሰላም ከእርስዎ ጋር ይሁን። መልካም በዓል!",
    "የገና ደወሎች ሲደውሉ ልብዎ በደስታ ይሞላ፤ አዲሱ ዘመን የበረከት ይሁንልዎ። መልካም ገና!",
];

/// Feminine second person (አንቺ).
pub const AMHARIC_FEMININE_GREETINGS: &[&str] = &[
    "እንኳን ለብርሃነ ልደቱ በሰላም አደረሰሽ! የገና በዓል ለአንቺና ለቤተሰብሽ የሰላምና የበረከት ይሁን።",
    "መልካም ገና ውዴ! የሻማው ብርሃንና የቡናው መዓዛ ቤትሽን በፍቅር ይሙላው።",
    "በዚህ የገና በዓል የጌታችን ልደት ደስታ ከአንቺ ጋር ይሁን። መልካም በዓል!",
    "አዲሱ ዘመን ለአንቺ የጤና፣ የሰላምና የደስታ ይሁንልሽ። መልካም ገና!",
];

/// Which pool a fallback was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    EnglishVerse,
    AmharicVerse,
    EnglishGreeting,
    AmharicGreeting,
    AmharicFeminineGreeting,
}

/// A fixed, ordered list of strings consumed round-robin.
#[derive(Debug, Clone)]
pub struct FallbackPool {
    items: &'static [&'static str],
    cursor: usize,
}

impl FallbackPool {
    pub fn new(items: &'static [&'static str]) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the entry under the cursor and advances it by one, wrapping.
    pub fn next_item(&mut self) -> Option<&'static str> {
        if self.items.is_empty() {
            return None;
        }
        let item = self.items[self.cursor % self.items.len()];
        self.cursor = (self.cursor + 1) % self.items.len();
        Some(item)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// All fallback pools with their rotation state.
#[derive(Debug, Clone)]
pub struct FallbackPools {
    english_verses: FallbackPool,
    amharic_verses: FallbackPool,
    english_greetings: FallbackPool,
    amharic_greetings: FallbackPool,
    amharic_feminine_greetings: FallbackPool,
}

impl Default for FallbackPools {
    fn default() -> Self {
        Self::new(
            ENGLISH_VERSES,
            AMHARIC_VERSES,
            ENGLISH_GREETINGS,
            AMHARIC_GREETINGS,
            AMHARIC_FEMININE_GREETINGS,
        )
    }
}

impl FallbackPools {
    pub fn new(
        english_verses: &'static [&'static str],
        amharic_verses: &'static [&'static str],
        english_greetings: &'static [&'static str],
        amharic_greetings: &'static [&'static str],
        amharic_feminine_greetings: &'static [&'static str],
    ) -> Self {
        Self {
            english_verses: FallbackPool::new(english_verses),
            amharic_verses: FallbackPool::new(amharic_verses),
            english_greetings: FallbackPool::new(english_greetings),
            amharic_greetings: FallbackPool::new(amharic_greetings),
            amharic_feminine_greetings: FallbackPool::new(amharic_feminine_greetings),
        }
    }

    pub fn verse_pool_for(language: LanguagePreference) -> PoolKind {
        match language {
            LanguagePreference::Amharic => PoolKind::AmharicVerse,
            LanguagePreference::Auto => PoolKind::EnglishVerse,
        }
    }

    /// Feminine pool only applies to Amharic and only when it has entries.
    pub fn greeting_pool_for(&self, language: LanguagePreference, voice: GreetingVoice) -> PoolKind {
        match (language, voice) {
            (LanguagePreference::Amharic, GreetingVoice::Feminine)
                if !self.amharic_feminine_greetings.is_empty() =>
            {
                PoolKind::AmharicFeminineGreeting
            }
            (LanguagePreference::Amharic, _) => PoolKind::AmharicGreeting,
            (LanguagePreference::Auto, _) => PoolKind::EnglishGreeting,
        }
    }

    pub fn pool(&self, kind: PoolKind) -> &FallbackPool {
        match kind {
            PoolKind::EnglishVerse => &self.english_verses,
            PoolKind::AmharicVerse => &self.amharic_verses,
            PoolKind::EnglishGreeting => &self.english_greetings,
            PoolKind::AmharicGreeting => &self.amharic_greetings,
            PoolKind::AmharicFeminineGreeting => &self.amharic_feminine_greetings,
        }
    }

    fn pool_mut(&mut self, kind: PoolKind) -> &mut FallbackPool {
        match kind {
            PoolKind::EnglishVerse => &mut self.english_verses,
            PoolKind::AmharicVerse => &mut self.amharic_verses,
            PoolKind::EnglishGreeting => &mut self.english_greetings,
            PoolKind::AmharicGreeting => &mut self.amharic_greetings,
            PoolKind::AmharicFeminineGreeting => &mut self.amharic_feminine_greetings,
        }
    }

    /// Next raw verse entry (`"<reference>|<text>"`).
    pub fn next_verse(&mut self, language: LanguagePreference) -> &'static str {
        let kind = Self::verse_pool_for(language);
        self.take(kind)
    }

    pub fn next_greeting(&mut self, language: LanguagePreference, voice: GreetingVoice) -> &'static str {
        let kind = self.greeting_pool_for(language, voice);
        self.take(kind)
    }

    fn take(&mut self, kind: PoolKind) -> &'static str {
        // Built-in pools are never empty; custom empty pools yield "".
        self.pool_mut(kind).next_item().unwrap_or_default()
    }

    /// Rewinds every cursor to the first entry.
    pub fn reset(&mut self) {
        for kind in [
            PoolKind::EnglishVerse,
            PoolKind::AmharicVerse,
            PoolKind::EnglishGreeting,
            PoolKind::AmharicGreeting,
            PoolKind::AmharicFeminineGreeting,
        ] {
            self.pool_mut(kind).reset();
        }
    }
}
