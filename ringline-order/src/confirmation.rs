//! Confirmation texts returned to the client after a successful booking.
//!
//! The system never sends email; these strings are the whole "delivery".
//! `booking_details` is the long printable summary, `alert_message` the short
//! popup text.

use chrono::Utc;

use ringline_core::models::{NewBooking, TourSummary};

pub fn booking_details(booking_id: i64, tour: &TourSummary, booking: &NewBooking) -> String {
    let description = tour
        .tour
        .full_description
        .as_deref()
        .or(tour.tour.description.as_deref())
        .unwrap_or_default();

    format!(
        "\n🎫 БРОНИРОВАНИЕ УСПЕШНО ОФОРМЛЕНО!\n\n\
📋 ДЕТАЛИ ЗАКАЗА:\n\
─────────────────\n\
🔸 Номер заказа: #{booking_id}\n\
🔸 Тур: \"{title}\"\n\
🔸 Город: {city}\n\
🔸 Продолжительность: {days} дней\n\
🔸 Дата создания: {created}\n\n\
👤 ИНФОРМАЦИЯ О БРОНИРОВАНИИ:\n\
─────────────────────────\n\
🔸 Количество билетов: {tickets}\n\
🔸 Цена за билет: {price} ₽\n\
🔸 Общая стоимость: {total} ₽\n\
🔸 Email для билетов: {email}\n\n\
📄 ОПИСАНИЕ ТУРА:\n\
────────────────\n\
{description}\n\n\
📍 МЕСТО СБОРА:\n\
──────────────\n\
Точное место сбора будет отправлено за 24 часа до начала тура.\n\n\
💡 ВАЖНАЯ ИНФОРМАЦИЯ:\n\
───────────────────\n\
• Сохраните этот номер заказа: #{booking_id}\n\
• Билеты будут отправлены на указанный email\n\
• При себе иметь документ, удостоверяющий личность\n\
• Отмена возможна за 48 часов до начала тура\n\n\
📞 ТЕХНИЧЕСКАЯ ПОДДЕРЖКА:\n\
──────────────────────\n\
По всем вопросам обращайтесь: \n\
support@golden-ring-travel.ru\n\
+7 (800) 555-35-35\n\n\
Спасибо за выбор нашей компании! 🎉\n",
        booking_id = booking_id,
        title = tour.tour.title,
        city = tour.city_name,
        days = tour.tour.duration_days,
        created = Utc::now().format("%d.%m.%Y, %H:%M:%S"),
        tickets = booking.ticket_count,
        price = tour.tour.price,
        total = booking.total_price,
        email = booking.customer_email,
        description = description,
    )
}

pub fn alert_message(tour: &TourSummary, booking: &NewBooking) -> String {
    format!(
        "✅ Заказ оформлен успешно!\n\n\
🎫 Тур: \"{title}\"\n\
📧 Билеты отправлены на: {email}\n\
🎟️ Количество билетов: {tickets}\n\
💰 Общая стоимость: {total} ₽\n\n\
Спасибо за заказ!",
        title = tour.tour.title,
        email = booking.customer_email,
        tickets = booking.ticket_count,
        total = booking.total_price,
    )
}
