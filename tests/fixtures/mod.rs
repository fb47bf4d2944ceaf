//! Classifier outputs and resume texts shared by the integration tests
#![allow(dead_code)]

use resume_classify::models::classification::{Alternative, Classification};

/// A resume text and the category the keyword classifier should assign.
#[derive(Debug, Clone)]
pub struct ResumeFixture {
    pub filename: &'static str,
    pub text: &'static str,
    pub expected_category: &'static str,
}

pub const RESUME_FIXTURES: &[ResumeFixture] = &[
    ResumeFixture {
        filename: "data_scientist.txt",
        text: "Machine learning engineer. Statistics, regression, pandas and numpy. Deep learning research.",
        expected_category: "Data Scientist",
    },
    ResumeFixture {
        filename: "devops.txt",
        text: "Ran Kubernetes clusters on AWS. Terraform, Ansible and Docker. Built CI/CD and monitoring.",
        expected_category: "DevOps Engineer",
    },
    ResumeFixture {
        filename: "designer.txt",
        text: "Figma wireframe and prototype work. Usability testing for user experience and user interface.",
        expected_category: "UI/UX Designer",
    },
    ResumeFixture {
        filename: "dba.txt",
        text: "Database administrator. PostgreSQL and Oracle replication, backup and query optimization.",
        expected_category: "Database Administrator",
    },
    ResumeFixture {
        filename: "sales.txt",
        text: "Sales lead. Exceeded quota, CRM pipelines, prospecting, lead generation and negotiation.",
        expected_category: "Sales Representative",
    },
    ResumeFixture {
        filename: "writer.txt",
        text: "Copywriting, editing and proofreading. Blog articles and storytelling for brands.",
        expected_category: "Content Writer",
    },
    ResumeFixture {
        filename: "support.txt",
        text: "Customer support agent. Zendesk tickets, helpdesk troubleshooting, customer service.",
        expected_category: "Customer Support",
    },
    ResumeFixture {
        filename: "hr.txt",
        text: "Human resources manager. Recruiting, onboarding, payroll and talent acquisition.",
        expected_category: "HR Manager",
    },
];

/// The classification a data-science resume should produce.
pub fn data_scientist_classification() -> Classification {
    Classification {
        category: "Data Scientist".to_string(),
        confidence: 0.88,
        alternatives: vec![
            Alternative {
                category: "Software Engineer".to_string(),
                confidence: 0.4,
            },
            Alternative {
                category: "Product Manager".to_string(),
                confidence: 0.3,
            },
        ],
        text_preview: "Jane Doe, data scientist with eight years of experience...".to_string(),
    }
}
