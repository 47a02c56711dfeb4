//! Общие контракты каталога Best Muscat.
//!
//! Чистая логика без ввода-вывода: нормализация записей, видимость секций
//! карточки, набор фактов для панели "Details", листинг и сборка спотлайта.

pub mod domain;
pub mod enums;
pub mod projections;
pub mod shared;
