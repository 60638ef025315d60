//! User-facing reply texts and button labels.
//!
//! Everything the daemon says to a user lives here, so the engine and the
//! handlers stay free of literal strings.

use crate::state::Gender;

/// Welcome message shown for /start, together with the gender keyboard.
pub const WELCOME: &str =
    "🌟 Добро пожаловать в *Таинственный чат*! Найди свою искру анонимно! 😎\nВыбери пол:";

/// Confirmation after a gender choice, together with the begin-search button.
pub fn gender_chosen(gender: Gender) -> String {
    format!(
        "🎉 Пол выбран: *{}*! Готов начать анонимную магию? 💬",
        gender.label()
    )
}

pub const SEARCHING: &str = "🔎 Ищем твою искру... Останься на связи! 😎";

pub const MATCHED: &str =
    "✨ Партнёр найден! Пиши и наслаждайся анонимной магией! 💬\n(/stop — выйти, /next — новый чат)";

pub const STOP_INITIATOR: &str = "🛑 Чат завершён. Хочешь новую искру? Жми /start!";

pub const STOP_PARTNER: &str = "🛑 Партнёр завершил чат. Хочешь новый? Жми /start!";

pub const NO_GENDER: &str = "Сначала выбери пол через /start.";

pub const ALREADY_IN_CHAT: &str = "Ты уже в чате! Используй /stop или /next.";

pub const NOT_IN_CHAT: &str = "Ты не в чате. Начни с /start!";

pub const NOT_IN_CHAT_RELAY: &str = "Ты не в чате. Жми /start или 'Начать чат'!";

// Inline keyboard button labels.
pub const BUTTON_MALE: &str = "👨 Мужской";
pub const BUTTON_FEMALE: &str = "👩 Женский";
pub const BUTTON_BEGIN: &str = "🔥 Начать чат";

// Command menu descriptions.
pub const MENU_START: &str = "🔥 Начать анонимный чат";
pub const MENU_STOP: &str = "🛑 Завершить чат";
pub const MENU_NEXT: &str = "➡️ Найти нового собеседника";
