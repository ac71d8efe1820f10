use transly::chatbot::{ChatLanguage, ChatMode, build_system_prompt};
use transly::languages::Lang;
use transly::translator::render_translation_prompt;

#[test]
fn chat_system_prompt_snapshot() {
    let prompt = build_system_prompt(ChatMode::General, ChatLanguage::En);
    insta::assert_snapshot!(prompt.trim_end(), @r#"
    You MUST use these FACTS to answer questions. These are the ONLY correct answers:
    NEPAL: Current PM = Prachanda, Capital = Kathmandu, Currency = NPR
    SRI LANKA: Current President = Anura Kumara Dissanayake, Capital = Colombo, Currency = LKR
    When asked about these, ALWAYS respond with the facts above. Never say you don't know or can't answer.
    Answer the question directly. Do not give generic greetings or preambles.

    Always respond in clear English.

    Answer questions about Nepal and Sri Lanka factually.
    FACTS: Nepal PM=Prachanda, Capital=Kathmandu, Currency=NPR. Sri Lanka Pres=Dissanayake, Capital=Colombo, Currency=LKR.
    MUST use these facts when asked. Direct answers only.
    "#);
}

#[test]
fn translation_system_prompt_snapshot() {
    let prompt = render_translation_prompt(Some(Lang::Si), Lang::En);
    insta::assert_snapshot!(prompt, @r#"
    You are a translation engine for Nepali, Sinhala and English.
    Translate the user's text from Sinhala into English.
    Respond with the translated text only: no explanations, no quotes, no transliteration notes. Preserve numbers, proper names and line breaks.
    "#);
}
