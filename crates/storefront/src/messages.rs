//! Interface strings for each locale.
//!
//! Catalog content comes from the store as multilingual text; these are the
//! fixed labels around it.

use vitrine_core::Locale;
use vitrine_core::validation::ValidationError;

/// Every fixed string the storefront renders.
#[derive(Debug)]
pub struct Messages {
    pub site_name: &'static str,
    pub tagline: &'static str,
    pub nav_home: &'static str,
    pub nav_products: &'static str,
    pub nav_about: &'static str,
    pub nav_contact: &'static str,
    pub language_label: &'static str,
    pub footer_rights: &'static str,

    pub home_title: &'static str,
    pub home_lead: &'static str,
    pub home_cta: &'static str,
    pub home_latest: &'static str,

    pub catalog_title: &'static str,
    pub search_label: &'static str,
    pub search_placeholder: &'static str,
    pub all_categories: &'static str,
    pub no_results: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub page_of: &'static str,
    pub price_label: &'static str,
    pub currency: &'static str,
    pub view_details: &'static str,
    pub features_title: &'static str,
    pub back_to_catalog: &'static str,
    pub request_quote: &'static str,

    pub about_title: &'static str,
    pub about_text: &'static str,
    pub certificates_title: &'static str,
    pub partners_title: &'static str,

    pub contact_title: &'static str,
    pub contact_lead: &'static str,
    pub field_name: &'static str,
    pub field_surname: &'static str,
    pub field_phone: &'static str,
    pub field_email: &'static str,
    pub field_message: &'static str,
    pub submit: &'static str,
    pub contact_success: &'static str,
    pub contact_failed: &'static str,

    pub error_required: &'static str,
    pub error_too_long: &'static str,
    pub error_email: &'static str,
    pub error_phone: &'static str,
    pub error_invalid: &'static str,

    pub not_found_title: &'static str,
    pub not_found_text: &'static str,
    pub server_error_title: &'static str,
    pub server_error_text: &'static str,
    pub bad_request_title: &'static str,
    pub bad_request_text: &'static str,
}

pub static RU: Messages = Messages {
    site_name: "Витрина",
    tagline: "Оборудование для птицеводства и животноводства",
    nav_home: "Главная",
    nav_products: "Каталог",
    nav_about: "О компании",
    nav_contact: "Контакты",
    language_label: "Язык",
    footer_rights: "Все права защищены.",

    home_title: "Надёжное оборудование для вашего хозяйства",
    home_lead: "Поставляем, устанавливаем и обслуживаем оборудование по всему Узбекистану.",
    home_cta: "Перейти в каталог",
    home_latest: "Новинки каталога",

    catalog_title: "Каталог продукции",
    search_label: "Поиск",
    search_placeholder: "Название, описание или характеристика",
    all_categories: "Все категории",
    no_results: "Ничего не найдено.",
    previous: "Назад",
    next: "Вперёд",
    page_of: "из",
    price_label: "Цена",
    currency: "сум",
    view_details: "Подробнее",
    features_title: "Характеристики",
    back_to_catalog: "Вернуться в каталог",
    request_quote: "Оставить заявку",

    about_title: "О компании",
    about_text: "Мы работаем с ведущими производителями и подтверждаем качество сертификатами.",
    certificates_title: "Сертификаты",
    partners_title: "Партнёры",

    contact_title: "Свяжитесь с нами",
    contact_lead: "Оставьте заявку, и менеджер перезвонит вам в течение рабочего дня.",
    field_name: "Имя",
    field_surname: "Фамилия",
    field_phone: "Телефон",
    field_email: "Эл. почта",
    field_message: "Сообщение",
    submit: "Отправить",
    contact_success: "Спасибо! Ваша заявка принята.",
    contact_failed: "Не удалось отправить заявку. Попробуйте ещё раз позже.",

    error_required: "Заполните это поле.",
    error_too_long: "Слишком длинное значение.",
    error_email: "Введите корректный адрес эл. почты.",
    error_phone: "Введите корректный номер телефона.",
    error_invalid: "Проверьте значение.",

    not_found_title: "Страница не найдена",
    not_found_text: "Такой страницы нет или товар был удалён.",
    server_error_title: "Что-то пошло не так",
    server_error_text: "Мы уже разбираемся. Попробуйте обновить страницу позже.",
    bad_request_title: "Некорректный запрос",
    bad_request_text: "Проверьте адрес страницы и параметры.",
};

pub static UZ: Messages = Messages {
    site_name: "Vitrina",
    tagline: "Parrandachilik va chorvachilik uskunalari",
    nav_home: "Bosh sahifa",
    nav_products: "Katalog",
    nav_about: "Kompaniya haqida",
    nav_contact: "Aloqa",
    language_label: "Til",
    footer_rights: "Barcha huquqlar himoyalangan.",

    home_title: "Xo'jaligingiz uchun ishonchli uskunalar",
    home_lead: "Butun O'zbekiston bo'ylab uskunalarni yetkazib beramiz, o'rnatamiz va xizmat ko'rsatamiz.",
    home_cta: "Katalogga o'tish",
    home_latest: "Katalogdagi yangiliklar",

    catalog_title: "Mahsulotlar katalogi",
    search_label: "Qidiruv",
    search_placeholder: "Nomi, tavsifi yoki xususiyati",
    all_categories: "Barcha toifalar",
    no_results: "Hech narsa topilmadi.",
    previous: "Orqaga",
    next: "Oldinga",
    page_of: "dan",
    price_label: "Narxi",
    currency: "so'm",
    view_details: "Batafsil",
    features_title: "Xususiyatlari",
    back_to_catalog: "Katalogga qaytish",
    request_quote: "Ariza qoldirish",

    about_title: "Kompaniya haqida",
    about_text: "Biz yetakchi ishlab chiqaruvchilar bilan ishlaymiz va sifatni sertifikatlar bilan tasdiqlaymiz.",
    certificates_title: "Sertifikatlar",
    partners_title: "Hamkorlar",

    contact_title: "Biz bilan bog'laning",
    contact_lead: "Ariza qoldiring, menejer ish kuni davomida qo'ng'iroq qiladi.",
    field_name: "Ism",
    field_surname: "Familiya",
    field_phone: "Telefon",
    field_email: "Elektron pochta",
    field_message: "Xabar",
    submit: "Yuborish",
    contact_success: "Rahmat! Arizangiz qabul qilindi.",
    contact_failed: "Arizani yuborib bo'lmadi. Keyinroq qayta urinib ko'ring.",

    error_required: "Ushbu maydonni to'ldiring.",
    error_too_long: "Qiymat juda uzun.",
    error_email: "To'g'ri elektron pochta manzilini kiriting.",
    error_phone: "To'g'ri telefon raqamini kiriting.",
    error_invalid: "Qiymatni tekshiring.",

    not_found_title: "Sahifa topilmadi",
    not_found_text: "Bunday sahifa yo'q yoki mahsulot o'chirilgan.",
    server_error_title: "Nimadir noto'g'ri ketdi",
    server_error_text: "Muammoni hal qilyapmiz. Sahifani keyinroq yangilang.",
    bad_request_title: "Noto'g'ri so'rov",
    bad_request_text: "Sahifa manzili va parametrlarni tekshiring.",
};

pub static EN: Messages = Messages {
    site_name: "Vitrine",
    tagline: "Poultry and livestock equipment",
    nav_home: "Home",
    nav_products: "Catalog",
    nav_about: "About",
    nav_contact: "Contact",
    language_label: "Language",
    footer_rights: "All rights reserved.",

    home_title: "Reliable equipment for your farm",
    home_lead: "We supply, install and service equipment across Uzbekistan.",
    home_cta: "Browse the catalog",
    home_latest: "New in the catalog",

    catalog_title: "Product catalog",
    search_label: "Search",
    search_placeholder: "Name, description or feature",
    all_categories: "All categories",
    no_results: "Nothing found.",
    previous: "Previous",
    next: "Next",
    page_of: "of",
    price_label: "Price",
    currency: "UZS",
    view_details: "Details",
    features_title: "Features",
    back_to_catalog: "Back to catalog",
    request_quote: "Request a quote",

    about_title: "About us",
    about_text: "We work with leading manufacturers and back our quality with certificates.",
    certificates_title: "Certificates",
    partners_title: "Partners",

    contact_title: "Get in touch",
    contact_lead: "Leave a request and a manager will call you back within one business day.",
    field_name: "First name",
    field_surname: "Last name",
    field_phone: "Phone",
    field_email: "Email",
    field_message: "Message",
    submit: "Send",
    contact_success: "Thank you! Your request has been received.",
    contact_failed: "We could not send your request. Please try again later.",

    error_required: "Please fill in this field.",
    error_too_long: "This value is too long.",
    error_email: "Enter a valid email address.",
    error_phone: "Enter a valid phone number.",
    error_invalid: "Please check this value.",

    not_found_title: "Page not found",
    not_found_text: "This page does not exist or the product was removed.",
    server_error_title: "Something went wrong",
    server_error_text: "We are looking into it. Please refresh the page later.",
    bad_request_title: "Bad request",
    bad_request_text: "Check the page address and parameters.",
};

impl Messages {
    /// Strings for `locale`.
    #[must_use]
    pub const fn for_locale(locale: Locale) -> &'static Self {
        match locale {
            Locale::Ru => &RU,
            Locale::Uz => &UZ,
            Locale::En => &EN,
        }
    }

    /// User-facing text for a failed form field.
    #[must_use]
    pub fn validation(&self, error: &ValidationError) -> &'static str {
        match error {
            ValidationError::Required { .. } => self.error_required,
            ValidationError::TooLong { .. } => self.error_too_long,
            ValidationError::Contact { field: "email", .. } => self.error_email,
            ValidationError::Contact { .. } => self.error_phone,
            _ => self.error_invalid,
        }
    }
}
