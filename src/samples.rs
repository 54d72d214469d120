//! Built-in text samples.
//!
//! The catalog is returned as a value and handed to the orchestrator
//! explicitly; nothing reads it as global state, so tests can substitute
//! synthetic samples freely.

use crate::core::types::Sample;

pub fn builtin_samples() -> Vec<Sample> {
    vec![
        Sample {
            name: "heavy".to_string(),
            title: "Heavy AI (Academic)".to_string(),
            text: "Artificial intelligence has fundamentally transformed the landscape of modern \
                   technology—incorporating machine learning, neural networks, and deep learning—into \
                   comprehensive solutions that revolutionize various industries. The implementation of \
                   AI systems demonstrates significant potential in addressing complex challenges. \
                   Furthermore, it's worth noting that these technologies facilitate unprecedented \
                   levels of automation, enhance decision-making processes, and promote innovative \
                   approaches to problem-solving. Additionally, the integration of AI encompasses \
                   various domains, including healthcare, finance, and education, where it is utilized \
                   to optimize performance and deliver substantial value to stakeholders."
                .to_string(),
            expected_original: "80-95% AI".to_string(),
            expected_humanized: "<25% AI".to_string(),
        },
        Sample {
            name: "medium".to_string(),
            title: "Medium AI (Blog)".to_string(),
            text: "In today's fast-paced world, understanding the importance of digital marketing is \
                   crucial for business success. Let's dive into the key strategies that can help you \
                   navigate through this complex landscape. First, social media engagement plays a \
                   vital role in building brand awareness. Moreover, content marketing facilitates \
                   meaningful connections with your target audience. Additionally, data-driven \
                   decision making enables businesses to optimize their campaigns effectively."
                .to_string(),
            expected_original: "50-70% AI".to_string(),
            expected_humanized: "<20% AI".to_string(),
        },
    ]
}

/// Look a sample up by its short name.
pub fn find<'a>(samples: &'a [Sample], name: &str) -> Option<&'a Sample> {
    samples.iter().find(|s| s.name == name)
}
