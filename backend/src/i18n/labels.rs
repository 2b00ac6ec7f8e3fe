//! UI label tables.
//!
//! Keys are the ones returned by [`super::Label::key`].

pub(super) const EN: &[(&str, &str)] = &[
    ("report_title", "School Assessment Report Card"),
    ("school_name", "School Name"),
    ("school_code", "School Code"),
    ("overall_average", "Overall School Average"),
    ("english", "English"),
    ("mathematics", "Mathematics"),
    ("science", "Science"),
    ("social_science", "Social Science"),
    ("no_data", "No data"),
    ("subjectwise_averages", "Subject-wise Average Scores"),
    ("priority_distribution", "Competency Priority Distribution by Grade"),
    ("subject", "Subject"),
    ("average_score", "Average Score"),
    ("high_priority", "High Priority (0-4.9)"),
    ("medium_priority", "Medium Priority (5.0-6.9)"),
    ("low_priority", "Low Priority (7.0+)"),
    ("high", "High"),
    ("medium", "Medium"),
    ("low", "Low"),
    ("grade", "Grade"),
    ("grade_6", "Grade 6"),
    ("grade_7", "Grade 7"),
    ("grade_8", "Grade 8"),
    ("detailed_report", "Detailed Competency Report"),
    ("competency", "Competency"),
    ("score", "Score"),
    ("priority", "Priority"),
];

pub(super) const HI: &[(&str, &str)] = &[
    ("report_title", "स्कूल मूल्यांकन रिपोर्ट कार्ड"),
    ("school_name", "स्कूल का नाम"),
    ("school_code", "स्कूल कोड"),
    ("overall_average", "समग्र स्कूल औसत"),
    ("english", "अंग्रेज़ी"),
    ("mathematics", "गणित"),
    ("science", "विज्ञान"),
    ("social_science", "सामाजिक विज्ञान"),
    ("no_data", "कोई डेटा नहीं"),
    ("subjectwise_averages", "विषयवार औसत अंक"),
    ("priority_distribution", "ग्रेड के अनुसार दक्षता प्राथमिकता वितरण"),
    ("subject", "विषय"),
    ("average_score", "औसत अंक"),
    ("high_priority", "उच्च प्राथमिकता (0-4.9)"),
    ("medium_priority", "मध्यम प्राथमिकता (5.0-6.9)"),
    ("low_priority", "निम्न प्राथमिकता (7.0+)"),
    ("high", "उच्च"),
    ("medium", "मध्यम"),
    ("low", "निम्न"),
    ("grade", "कक्षा"),
    ("grade_6", "कक्षा 6"),
    ("grade_7", "कक्षा 7"),
    ("grade_8", "कक्षा 8"),
    ("detailed_report", "विस्तृत दक्षता रिपोर्ट"),
    ("competency", "दक्षता"),
    ("score", "अंक"),
    ("priority", "प्राथमिकता"),
];
