//! Static reference lists shown next to search results.

use serde::Serialize;

/// Topics present in the data that operators no longer use.
pub const UNUSED_TOPICS: &[&str] = &[
    "Local_Balance_Transfer",
    "Local_Friends",
    "Local_Next_Payment",
    "Local_Order_Cash",
    "Local_Other_Cashback",
    "Local_RemittanceStatus",
    "Подожди (Wait)",
    "Local_X5",
    "PassportChangeFirst",
    "PassportChangeSecond",
    "Меньше (Local_Less)",
    "Больше (Local_More)",
    "Рефинансирование под залог недвижимости",
    "Действующий займ",
    "General Мои кредитные предложения",
    "Настроить/Изменить/Восстановить",
    "Как сделать устройство доверенным",
    "Что такое доверенное устройство",
    "Что такое секретный код",
    "Новая карта",
    "Проблема с начислением кэшбэка",
];

/// Replies interpreted as "yes".
pub const YES_INTERPRETATIONS: &[&str] = &[
    "Да",
    "Ага",
    "Угу",
    "Можно",
    "Готов",
    "Подскажите",
    "Расскажи",
    "Скажи",
    "Проверь",
];

/// Replies interpreted as "no".
pub const NO_INTERPRETATIONS: &[&str] = &["Не надо", "Не хочу", "Не готов", "Не интересно"];

#[derive(Debug, Serialize)]
pub struct ReferenceLists {
    pub unused_topics: &'static [&'static str],
    pub yes: &'static [&'static str],
    pub no: &'static [&'static str],
}

pub fn reference_lists() -> ReferenceLists {
    ReferenceLists {
        unused_topics: UNUSED_TOPICS,
        yes: YES_INTERPRETATIONS,
        no: NO_INTERPRETATIONS,
    }
}
