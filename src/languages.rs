use serde::Serialize;

/// A speech language the TTS server accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> Language {
    Language { code, name }
}

/// Supported speech languages, ordered by display name.
pub const LANGUAGES: &[Language] = &[
    lang("af", "Afrikaans"),
    lang("sq", "Albanian"),
    lang("am", "Amharic"),
    lang("ar", "Arabic"),
    lang("hy", "Armenian"),
    lang("az", "Azerbaijani"),
    lang("eu", "Basque"),
    lang("be", "Belarusian"),
    lang("bn", "Bengali"),
    lang("bs", "Bosnian"),
    lang("bg", "Bulgarian"),
    lang("ca", "Catalan"),
    lang("ceb", "Cebuano"),
    lang("ny", "Chichewa"),
    lang("zh-cn", "Chinese (Simplified)"),
    lang("zh-tw", "Chinese (Traditional)"),
    lang("co", "Corsican"),
    lang("hr", "Croatian"),
    lang("cs", "Czech"),
    lang("da", "Danish"),
    lang("nl", "Dutch"),
    lang("en", "English"),
    lang("eo", "Esperanto"),
    lang("et", "Estonian"),
    lang("tl", "Filipino"),
    lang("fi", "Finnish"),
    lang("fr", "French"),
    lang("fy", "Frisian"),
    lang("gl", "Galician"),
    lang("ka", "Georgian"),
    lang("de", "German"),
    lang("el", "Greek"),
    lang("gu", "Gujarati"),
    lang("ht", "Haitian Creole"),
    lang("ha", "Hausa"),
    lang("haw", "Hawaiian"),
    lang("he", "Hebrew"),
    lang("hi", "Hindi"),
    lang("hmn", "Hmong"),
    lang("hu", "Hungarian"),
    lang("is", "Icelandic"),
    lang("ig", "Igbo"),
    lang("id", "Indonesian"),
    lang("ga", "Irish"),
    lang("it", "Italian"),
    lang("ja", "Japanese"),
    lang("jw", "Javanese"),
    lang("kn", "Kannada"),
    lang("kk", "Kazakh"),
    lang("km", "Khmer"),
    lang("ko", "Korean"),
    lang("ku", "Kurdish (Kurmanji)"),
    lang("ky", "Kyrgyz"),
    lang("lo", "Lao"),
    lang("la", "Latin"),
    lang("lv", "Latvian"),
    lang("lt", "Lithuanian"),
    lang("lb", "Luxembourgish"),
    lang("mk", "Macedonian"),
    lang("mg", "Malagasy"),
    lang("ms", "Malay"),
    lang("ml", "Malayalam"),
    lang("mt", "Maltese"),
    lang("mi", "Maori"),
    lang("mr", "Marathi"),
    lang("mn", "Mongolian"),
    lang("my", "Myanmar (Burmese)"),
    lang("ne", "Nepali"),
    lang("no", "Norwegian"),
    lang("or", "Odia"),
    lang("ps", "Pashto"),
    lang("fa", "Persian"),
    lang("pl", "Polish"),
    lang("pt", "Portuguese"),
    lang("pa", "Punjabi"),
    lang("ro", "Romanian"),
    lang("ru", "Russian"),
    lang("sm", "Samoan"),
    lang("gd", "Scots Gaelic"),
    lang("sr", "Serbian"),
    lang("st", "Sesotho"),
    lang("sn", "Shona"),
    lang("sd", "Sindhi"),
    lang("si", "Sinhala"),
    lang("sk", "Slovak"),
    lang("sl", "Slovenian"),
    lang("so", "Somali"),
    lang("es", "Spanish"),
    lang("su", "Sundanese"),
    lang("sw", "Swahili"),
    lang("sv", "Swedish"),
    lang("tg", "Tajik"),
    lang("ta", "Tamil"),
    lang("tt", "Tatar"),
    lang("te", "Telugu"),
    lang("th", "Thai"),
    lang("tr", "Turkish"),
    lang("tk", "Turkmen"),
    lang("uk", "Ukrainian"),
    lang("ur", "Urdu"),
    lang("ug", "Uyghur"),
    lang("uz", "Uzbek"),
    lang("vi", "Vietnamese"),
    lang("cy", "Welsh"),
    lang("xh", "Xhosa"),
    lang("yi", "Yiddish"),
    lang("yo", "Yoruba"),
    lang("zu", "Zulu"),
];

/// Display name for a language code, matched case-insensitively.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code))
        .map(|l| l.name)
}
