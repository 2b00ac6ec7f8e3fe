//! Competency name tables.
//!
//! English keys must match the competency names of the export exactly.
//! Names missing from a language resolve through the English table.

pub(super) const EN: &[(&str, &str)] = &[
    // English
    ("Building Correct Sentences and Using Proper Grammar", "Building Correct Sentences and Using Proper Grammar"),
    ("Reading Comprehension", "Reading Comprehension"),
    ("Understanding Stories and Poems", "Understanding Stories and Poems"),
    ("Vocabulary", "Vocabulary"),
    ("Writing Clear and Organized Ideas", "Writing Clear and Organized Ideas"),
    // Mathematics
    ("Lines and Angles", "Lines and Angles"),
    ("Perimeter and Area", "Perimeter and Area"),
    ("Representing and Interpreting Data", "Representing and Interpreting Data"),
    ("Solving Problems with Algebra (Unknowns)", "Solving Problems with Algebra (Unknowns)"),
    ("Solving Problems with Numbers", "Solving Problems with Numbers"),
    ("Understanding Shapes and Measurement", "Understanding Shapes and Measurement"),
    ("Understanding and Ordering Numbers", "Understanding and Ordering Numbers"),
    ("Understanding and Using Number Properties", "Understanding and Using Number Properties"),
    ("Working with Fractions and Decimals", "Working with Fractions and Decimals"),
    // Science
    ("Applying Science to Everyday Life", "Applying Science to Everyday Life"),
    ("Ensuring Healthy Plant Growth and Food Safety", "Ensuring Healthy Plant Growth and Food Safety"),
    ("Making Healthy Food Choices and Identifying Food Components", "Making Healthy Food Choices and Identifying Food Components"),
    ("Measuring Physical Properties", "Measuring Physical Properties"),
    ("Understanding Heat and Its Transfer", "Understanding Heat and Its Transfer"),
    ("Understanding Living Organisms and Life Processes", "Understanding Living Organisms and Life Processes"),
    ("Understanding Properties and Changes of Materials", "Understanding Properties and Changes of Materials"),
    ("Understanding how magnets work", "Understanding how magnets work"),
    ("Understanding how materials and weather affect us", "Understanding how materials and weather affect us"),
    // Social Science
    ("Analyzing Social Change & Justice", "Analyzing Social Change & Justice"),
    ("Appreciating India's Cultural and Historical Heritage", "Appreciating India's Cultural and Historical Heritage"),
    ("Appreciating Rajasthan's Culture and History", "Appreciating Rajasthan's Culture and History"),
    ("Exploring Historical Places and Events", "Exploring Historical Places and Events"),
    ("Exploring Livelihoods in Our Region", "Exploring Livelihoods in Our Region"),
    ("Understanding Community Rules and Rights", "Understanding Community Rules and Rights"),
    ("Understanding Constitutional Rights & Duties", "Understanding Constitutional Rights & Duties"),
    ("Understanding Democratic Governance", "Understanding Democratic Governance"),
    ("Understanding Early Civilizations", "Understanding Early Civilizations"),
    ("Understanding Economic Development", "Understanding Economic Development"),
    ("Understanding Local governance", "Understanding Local governance"),
    ("Understanding Natural Environment & Resources", "Understanding Natural Environment & Resources"),
];

pub(super) const HI: &[(&str, &str)] = &[
    // English
    ("Vocabulary", "शब्दावली"),
    ("Reading Comprehension", "पठन बोध"),
    ("Understanding Stories and Poems", "कहानियों और कविताओं की समझ"),
    ("Writing Clear and Organized Ideas", "स्पष्ट और व्यवस्थित लेखन"),
    ("Building Correct Sentences and Using Proper Grammar", "सही वाक्य निर्माण और व्याकरण का सही प्रयोग"),
    // Mathematics
    ("Lines and Angles", "रेखाएँ और कोण"),
    ("Perimeter and Area", "परिमाप और क्षेत्रफल"),
    ("Solving Problems with Numbers", "संख्याओं से समस्याएँ हल करना"),
    ("Understanding Shapes and Measurement", "आकृतियों और मापन की समझ"),
    ("Understanding and Using Number Properties", "संख्या गुणधर्मों की समझ और उपयोग"),
    ("Understanding and Ordering Numbers", "संख्याओं की समझ और क्रमबद्ध करना"),
    ("Representing and Interpreting Data", "डेटा का प्रतिनिधित्व और व्याख्या"),
    ("Solving Problems with Algebra (Unknowns)", "बीजगणित से समस्याएँ हल करना"),
    ("Working with Fractions and Decimals", "भिन्न और दशमलव के साथ काम करना"),
    // Science
    ("Applying Science to Everyday Life", "रोजमर्रा की जिंदगी में विज्ञान का प्रयोग"),
    ("Making Healthy Food Choices and Identifying Food Components", "स्वस्थ भोजन विकल्प और खाद्य घटकों की पहचान"),
    ("Understanding Living Organisms and Life Processes", "जीवित जीवों और जीवन प्रक्रियाओं की समझ"),
    ("Understanding Properties and Changes of Materials", "पदार्थों के गुण और परिवर्तन की समझ"),
    ("Understanding how magnets work", "चुंबक कैसे काम करते हैं"),
    ("Ensuring Healthy Plant Growth and Food Safety", "स्वस्थ पौधों की वृद्धि और खाद्य सुरक्षा"),
    ("Measuring Physical Properties", "भौतिक गुणों को मापना"),
    ("Understanding Heat and Its Transfer", "गर्मी और इसके स्थानांतरण की समझ"),
    ("Understanding how materials and weather affect us", "पदार्थ और मौसम हमें कैसे प्रभावित करते हैं"),
    // Social Science
    ("Appreciating India's Cultural and Historical Heritage", "भारत की सांस्कृतिक और ऐतिहासिक विरासत की सराहना"),
    ("Appreciating Rajasthan's Culture and History", "राजस्थान की संस्कृति और इतिहास की सराहना"),
    ("Exploring Historical Places and Events", "ऐतिहासिक स्थानों और घटनाओं की खोज"),
    ("Understanding Community Rules and Rights", "समुदाय के नियम और अधिकार की समझ"),
    ("Understanding Early Civilizations", "प्रारंभिक सभ्यताओं की समझ"),
    ("Understanding Natural Environment & Resources", "प्राकृतिक पर्यावरण और संसाधनों की समझ"),
    ("Analyzing Social Change & Justice", "सामाजिक परिवर्तन और न्याय का विश्लेषण"),
    ("Exploring Livelihoods in Our Region", "हमारे क्षेत्र में आजीविका की खोज"),
    ("Understanding Constitutional Rights & Duties", "संवैधानिक अधिकार और कर्तव्यों की समझ"),
    ("Understanding Economic Development", "आर्थिक विकास की समझ"),
    ("Understanding Local governance", "स्थानीय शासन की समझ"),
];
