use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Static FAQ list served by `GET /chatbot/faq`.
pub fn faq_items() -> Vec<FaqItem> {
    FAQ_DATA
        .iter()
        .map(|(question, answer)| FaqItem {
            question: (*question).to_string(),
            answer: (*answer).to_string(),
        })
        .collect()
}

const FAQ_DATA: &[(&str, &str)] = &[
    // Nepal basics
    (
        "What is the capital of Nepal?",
        "The capital city of Nepal is Kathmandu. It is famous for its historic temples, Durbar Squares, and vibrant cultural life.",
    ),
    (
        "What is the official language of Nepal?",
        "The official language of Nepal is Nepali. It is written in the Devanagari script and is spoken across the country alongside many regional languages.",
    ),
    (
        "Which mountains are in Nepal?",
        "Nepal is home to the Himalayan mountain range, including Mount Everest (Sagarmatha), the world's highest peak, as well as Annapurna, Manaslu, and many others.",
    ),
    (
        "What is Dashain festival in Nepal?",
        "Dashain is Nepal's biggest festival, celebrating the victory of good over evil. Families gather, receive tika and jamara from elders, and enjoy special foods and traditions.",
    ),
    (
        "What is Tihar festival?",
        "Tihar, also known as Deepawali, is the festival of lights in Nepal. It honours crows, dogs, cows, and Laxmi, the goddess of wealth, with lamps, rangoli, and family celebrations.",
    ),
    (
        "Which currency is used in Nepal?",
        "Nepal uses the Nepalese Rupee (NPR) as its official currency.",
    ),
    (
        "What is the major religion in Nepal?",
        "Hinduism is the majority religion in Nepal, followed by Buddhism. The two traditions are closely linked in culture and daily life.",
    ),
    (
        "What are some famous places to visit in Nepal?",
        "Popular destinations include Kathmandu Valley, Pokhara, Chitwan National Park, Lumbini (the birthplace of Buddha), and trekking regions like Everest and Annapurna.",
    ),
    // Sri Lanka basics
    (
        "What is the capital of Sri Lanka?",
        "Sri Lanka has two capitals: Sri Jayawardenepura Kotte as the official administrative capital, and Colombo as the commercial capital.",
    ),
    (
        "What is the national flower of Sri Lanka?",
        "The national flower of Sri Lanka is the Blue Water Lily (Nymphaea nouchali), known locally as Nil Manel.",
    ),
    (
        "Which languages are official in Sri Lanka?",
        "Sri Lanka has two official languages: Sinhala and Tamil. English is widely used as a link language in administration, education, and business.",
    ),
    (
        "What is Vesak in Sri Lanka?",
        "Vesak is a major Buddhist festival marking the birth, enlightenment, and passing away (Parinirvana) of the Buddha. Streets and homes are decorated with lanterns and pandals.",
    ),
    (
        "What is the currency of Sri Lanka?",
        "Sri Lanka uses the Sri Lankan Rupee (LKR) as its official currency.",
    ),
    (
        "What are popular tourist spots in Sri Lanka?",
        "Key attractions include Sigiriya Rock Fortress, Kandy, Ella, Galle, Yala National Park, and the coastal beaches like Mirissa and Unawatuna.",
    ),
    (
        "What is typical Sri Lankan food?",
        "Rice and curry is the staple, often served with dhal, vegetables, sambols, and sometimes fish or meat. Popular dishes include string hoppers, kottu, and hoppers (appa).",
    ),
    (
        "Which religions are followed in Sri Lanka?",
        "Buddhism is the majority religion, followed by Hinduism, Islam, and Christianity. Religious festivals from all communities are celebrated throughout the year.",
    ),
    // Nepal–Sri Lanka comparison & travel
    (
        "How are Nepal and Sri Lanka different in geography?",
        "Nepal is a landlocked, mountainous country dominated by the Himalayas, while Sri Lanka is an island nation in the Indian Ocean with coastal plains and central highlands.",
    ),
    (
        "Which time zone do Nepal and Sri Lanka use?",
        "Nepal uses Nepal Time (UTC+5:45). Sri Lanka uses Sri Lanka Standard Time (UTC+5:30).",
    ),
    (
        "Is it safe to travel to Nepal and Sri Lanka?",
        "Both Nepal and Sri Lanka are generally safe for tourists if you follow normal travel precautions, respect local customs, and keep updated through official advisories.",
    ),
    (
        "Do I need a visa to visit Nepal or Sri Lanka?",
        "Many visitors need a visa for both countries, often available on arrival or through an e-visa system. Always check the latest official requirements before travelling.",
    ),
    // Culture & history extras
    (
        "What is Lumbini famous for?",
        "Lumbini in Nepal is famous as the birthplace of Siddhartha Gautama, who became the Buddha. It is a UNESCO World Heritage Site with monasteries and a sacred garden.",
    ),
    (
        "Why is Kandy important in Sri Lanka?",
        "Kandy is culturally important because it hosts the Temple of the Tooth Relic (Sri Dalada Maligawa), one of the most sacred Buddhist sites in Sri Lanka.",
    ),
    (
        "What is special about Nepali and Sinhala New Year?",
        "Both Nepali New Year (around mid-April) and Sinhala and Tamil New Year in Sri Lanka celebrate the agricultural cycle with family gatherings, food, games, and rituals.",
    ),
    (
        "Can people speak English in Nepal and Sri Lanka?",
        "Yes. While local languages dominate daily life, many people in cities, tourism, and education can communicate in English in both countries.",
    ),
];
