/// Slug категории или записи.
///
/// Нижний регистр, каждая серия символов вне `[a-z0-9]` заменяется одним `-`,
/// крайние дефисы обрезаются. Одна и та же функция используется и для
/// гейтинга секций, и для выбора фактов, и для маршрутов.
///
/// ```
/// use contracts::shared::slug::slugify;
/// assert_eq!(slugify("Car Repair & Garages"), "car-repair-garages");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }

    out
}
