//! Fixed configuration constants and user-facing reply strings.
//! Replies are Turkish, matching what the group chat expects.

/// Span of one allocation: a range covers STEP consecutive numbers.
pub const STEP: i64 = 11;

/// Callback data carried by the inline button.
pub const NEXT_CALLBACK: &str = "next";

/// Label on the inline button that triggers the next allocation.
pub const NEXT_LABEL: &str = "Sonraki";

/// Defaults applied when the environment leaves a knob unset
pub mod defaults {
    pub const STATE_FILE: &str = "data.json";
    pub const PORT: u16 = 8080;
}

/// Everything the bot says back to the chat.
pub mod replies {
    pub const EDIT_USAGE: &str = "Lütfen geçerli bir sayı girin. Örnek: /edit 10002";
    pub const SIL_USAGE: &str = "Lütfen silmek istediğiniz mesajı alıntılayarak /sil yazın.";
    pub const SIL_EMPTY: &str = "Silinecek mesaj bulunamadı.";
    pub const SIL_NOT_LAST: &str = "Sadece botun son gönderdiği mesajı silebilirsiniz.";
    pub const SIL_DONE: &str = "Son mesaj silindi ve numaralar geri alındı.";
    pub const HOME: &str = "Bot çalışıyor!";

    pub fn edit_done(n: i64) -> String {
        format!("Başlangıç numarası {n:05} olarak ayarlandı.")
    }

    pub fn send_failed(e: &impl std::fmt::Display) -> String {
        format!("Hata oluştu: {e}")
    }

    pub fn delete_failed(e: &impl std::fmt::Display) -> String {
        format!("Mesaj silinemedi: {e}")
    }
}
