//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a chat message in characters.
pub const MAX_CHAT_TEXT_CHARS: usize = 10_000;

/// User identifier value object.
///
/// Assigned by the hosting environment and carried in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
///
/// Names travel inside the `id:name,...` directory payload, so they can
/// contain neither `,` nor `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// # Arguments
    ///
    /// * `name` - The display name string
    ///
    /// # Returns
    ///
    /// A Result containing the DisplayName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        if let Some(c) = name.chars().find(|c| matches!(c, ',' | ':')) {
            return Err(ValueObjectError::DisplayNameInvalidChar(c));
        }
        Ok(Self(name))
    }

    /// Name shown for a sender missing from the directory.
    pub fn placeholder(id: UserId) -> Self {
        Self(format!("unknown#{id}"))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat text value object.
///
/// Represents the text of an outbound chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    /// Create a new ChatText.
    ///
    /// Whitespace-only text counts as empty. The text itself is kept as typed.
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.trim().is_empty() {
            return Err(ValueObjectError::ChatTextEmpty);
        }
        let len = text.chars().count();
        if len > MAX_CHAT_TEXT_CHARS {
            return Err(ValueObjectError::ChatTextTooLong {
                max: MAX_CHAT_TEXT_CHARS,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ChatText {
    type Error = ValueObjectError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl fmt::Display for ChatText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_new_success() {
        // テスト項目: 有効な表示名を作成できる
        // when (操作):
        let result = DisplayName::new("Alice".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "Alice");
    }

    #[test]
    fn test_display_name_new_empty_fails() {
        // テスト項目: 空の表示名は作成できない
        // when (操作):
        let result = DisplayName::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::DisplayNameEmpty);
    }

    #[test]
    fn test_display_name_with_separator_fails() {
        // テスト項目: ディレクトリの区切り文字を含む表示名は作成できない
        // then (期待する結果):
        assert_eq!(
            DisplayName::new("Al,ice".to_string()).unwrap_err(),
            ValueObjectError::DisplayNameInvalidChar(',')
        );
        assert_eq!(
            DisplayName::new("Al:ice".to_string()).unwrap_err(),
            ValueObjectError::DisplayNameInvalidChar(':')
        );
    }

    #[test]
    fn test_display_name_placeholder() {
        // テスト項目: ディレクトリに無いユーザー用の仮名が作れる
        // when (操作):
        let name = DisplayName::placeholder(UserId::new(42));

        // then (期待する結果):
        assert_eq!(name.as_str(), "unknown#42");
    }

    #[test]
    fn test_chat_text_new_success() {
        // テスト項目: 有効なチャット本文を作成できる（前後の空白は保持）
        // when (操作):
        let result = ChatText::new(" hi ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), " hi ");
    }

    #[test]
    fn test_chat_text_blank_fails() {
        // テスト項目: 空白だけの本文は作成できない
        // then (期待する結果):
        assert_eq!(
            ChatText::new("".to_string()).unwrap_err(),
            ValueObjectError::ChatTextEmpty
        );
        assert_eq!(
            ChatText::new("  \n".to_string()).unwrap_err(),
            ValueObjectError::ChatTextEmpty
        );
    }

    #[test]
    fn test_chat_text_too_long_fails() {
        // テスト項目: 10001 文字以上の本文は作成できない
        // when (操作):
        let result = ChatText::new("あ".repeat(10001));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ChatTextTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_user_id_ordering_and_display() {
        // テスト項目: UserId は順序付けでき、数値として表示される
        // given (前提条件):
        let alice = UserId::new(1);
        let bob = UserId::from(2);

        // then (期待する結果):
        assert!(alice < bob);
        assert_eq!(bob.to_string(), "2");
        assert_eq!(bob.value(), 2);
    }
}
