//! Static skill dictionary and the role signatures built on top of it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Programming,
    Web,
    Database,
    Cloud,
    DataScience,
    Engineering,
    EngineeringTools,
    Business,
    Other,
}

impl SkillCategory {
    pub fn label(self) -> &'static str {
        match self {
            Programming => "Programming",
            Web => "Web",
            Database => "Databases",
            Cloud => "Cloud & DevOps",
            DataScience => "Data Science",
            Engineering => "Engineering",
            EngineeringTools => "Engineering Tools",
            Business => "Business",
            Other => "Other",
        }
    }
}

#[derive(Debug)]
pub struct Skill {
    pub name: &'static str,
    pub category: SkillCategory,
    pub aliases: &'static [&'static str],
}

const fn skill(
    name: &'static str,
    category: SkillCategory,
    aliases: &'static [&'static str],
) -> Skill {
    Skill { name, category, aliases }
}

use SkillCategory::*;

pub const SKILLS: &[Skill] = &[
    // Programming
    skill("python", Programming, &[]),
    skill("java", Programming, &[]),
    skill("javascript", Programming, &["js", "ecmascript"]),
    skill("typescript", Programming, &["ts"]),
    skill("c++", Programming, &["cpp"]),
    skill("c#", Programming, &["csharp", "c sharp"]),
    skill("ruby", Programming, &[]),
    skill("php", Programming, &[]),
    skill("swift", Programming, &[]),
    skill("kotlin", Programming, &[]),
    skill("go", Programming, &["golang"]),
    skill("rust", Programming, &[]),
    skill("scala", Programming, &[]),
    skill("r", Programming, &[]),
    skill("matlab", Programming, &[]),
    skill("perl", Programming, &[]),
    skill("shell", Programming, &["shell scripting"]),
    skill("bash", Programming, &[]),
    // Web
    skill("html", Web, &["html5"]),
    skill("css", Web, &["css3"]),
    skill("react", Web, &["reactjs", "react.js"]),
    skill("angular", Web, &["angularjs"]),
    skill("vue", Web, &["vuejs", "vue.js"]),
    skill("node.js", Web, &["nodejs", "node js"]),
    skill("express", Web, &["expressjs"]),
    skill("django", Web, &[]),
    skill("flask", Web, &[]),
    skill("spring", Web, &["spring boot"]),
    skill("asp.net", Web, &[]),
    skill("jquery", Web, &[]),
    skill("bootstrap", Web, &[]),
    skill("tailwind", Web, &["tailwindcss"]),
    skill("webpack", Web, &[]),
    skill("npm", Web, &[]),
    skill("yarn", Web, &[]),
    // Databases
    skill("sql", Database, &[]),
    skill("mysql", Database, &[]),
    skill("postgresql", Database, &["postgres"]),
    skill("mongodb", Database, &["mongo"]),
    skill("redis", Database, &[]),
    skill("oracle", Database, &[]),
    skill("sqlite", Database, &[]),
    skill("cassandra", Database, &[]),
    skill("dynamodb", Database, &[]),
    skill("elasticsearch", Database, &[]),
    skill("neo4j", Database, &[]),
    skill("firebase", Database, &[]),
    // Cloud & DevOps
    skill("aws", Cloud, &["amazon web services"]),
    skill("azure", Cloud, &[]),
    skill("gcp", Cloud, &["google cloud"]),
    skill("docker", Cloud, &[]),
    skill("kubernetes", Cloud, &["k8s"]),
    skill("jenkins", Cloud, &[]),
    skill("gitlab", Cloud, &[]),
    skill("github", Cloud, &[]),
    skill("terraform", Cloud, &[]),
    skill("ansible", Cloud, &[]),
    skill("ci/cd", Cloud, &["cicd", "ci cd", "continuous integration"]),
    skill("devops", Cloud, &[]),
    skill("cloud", Cloud, &["cloud computing"]),
    // Data science & ML
    skill("machine learning", DataScience, &["ml"]),
    skill("deep learning", DataScience, &[]),
    skill("tensorflow", DataScience, &[]),
    skill("pytorch", DataScience, &[]),
    skill("keras", DataScience, &[]),
    skill("scikit-learn", DataScience, &["scikit learn", "sklearn"]),
    skill("pandas", DataScience, &[]),
    skill("numpy", DataScience, &[]),
    skill("data analysis", DataScience, &["data analytics"]),
    skill("data science", DataScience, &[]),
    skill("nlp", DataScience, &["natural language processing"]),
    skill("computer vision", DataScience, &[]),
    skill("artificial intelligence", DataScience, &["ai"]),
    skill("neural networks", DataScience, &["neural network"]),
    // Engineering disciplines
    skill("electrical engineering", Engineering, &[]),
    skill("mechanical engineering", Engineering, &[]),
    skill("civil engineering", Engineering, &[]),
    skill("chemical engineering", Engineering, &[]),
    skill("computer engineering", Engineering, &[]),
    skill("software engineering", Engineering, &[]),
    skill("systems engineering", Engineering, &[]),
    skill("industrial engineering", Engineering, &[]),
    skill("aerospace engineering", Engineering, &[]),
    // Engineering tools
    skill("autocad", EngineeringTools, &[]),
    skill("solidworks", EngineeringTools, &[]),
    skill("simulink", EngineeringTools, &[]),
    skill("plc", EngineeringTools, &["plcs"]),
    skill("scada", EngineeringTools, &[]),
    skill("pcb design", EngineeringTools, &["pcb", "pcb layout"]),
    skill("circuit design", EngineeringTools, &[]),
    skill("embedded systems", EngineeringTools, &["embedded"]),
    skill("microcontrollers", EngineeringTools, &["microcontroller"]),
    skill("fpga", EngineeringTools, &[]),
    skill("vhdl", EngineeringTools, &[]),
    skill("verilog", EngineeringTools, &[]),
    skill("cad", EngineeringTools, &[]),
    skill("fem", EngineeringTools, &["fea", "finite element"]),
    skill("cfd", EngineeringTools, &[]),
    skill("ansys", EngineeringTools, &[]),
    skill("catia", EngineeringTools, &[]),
    // Business & management
    skill("project management", Business, &["pmp"]),
    skill("agile", Business, &[]),
    skill("scrum", Business, &[]),
    skill("kanban", Business, &[]),
    skill("product management", Business, &[]),
    skill("business analysis", Business, &[]),
    skill("excel", Business, &[]),
    skill("powerpoint", Business, &[]),
    skill("tableau", Business, &[]),
    skill("power bi", Business, &["powerbi"]),
    skill("salesforce", Business, &[]),
    skill("sap", Business, &[]),
    skill("erp", Business, &[]),
    skill("crm", Business, &[]),
    // Other technical
    skill("linux", Other, &[]),
    skill("unix", Other, &[]),
    skill("windows", Other, &[]),
    skill("macos", Other, &[]),
    skill("git", Other, &[]),
    skill("api", Other, &["apis"]),
    skill("rest", Other, &["restful"]),
    skill("graphql", Other, &[]),
    skill("microservices", Other, &[]),
    skill("testing", Other, &[]),
    skill("debugging", Other, &[]),
    skill("troubleshooting", Other, &[]),
];

pub fn lookup(name: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.name == name)
}

impl Skill {
    /// Whether the skill or one of its aliases appears in lower-cased `text`.
    pub fn mentioned_in(&self, text: &str) -> bool {
        crate::normalize::contains_term(text, self.name)
            || self.aliases.iter().any(|alias| crate::normalize::contains_term(text, alias))
    }
}

/// Role titles suggested from a skill set, each with its skill signature.
pub const ROLE_SIGNATURES: &[(&str, &[&str])] = &[
    ("Software Engineer", &["python", "java", "javascript", "software engineering", "git"]),
    ("Data Scientist", &["python", "machine learning", "data analysis", "tensorflow", "pandas"]),
    ("DevOps Engineer", &["docker", "kubernetes", "aws", "azure", "ci/cd", "jenkins"]),
    ("Full Stack Developer", &["react", "node.js", "javascript", "html", "css", "mongodb"]),
    ("Frontend Developer", &["react", "angular", "vue", "javascript", "html", "css"]),
    ("Backend Developer", &["python", "java", "node.js", "sql", "api", "rest"]),
    ("Machine Learning Engineer", &["machine learning", "tensorflow", "pytorch", "python", "deep learning"]),
    ("Electrical Engineer", &["electrical engineering", "circuit design", "pcb design", "embedded systems"]),
    ("Mechanical Engineer", &["mechanical engineering", "autocad", "solidworks", "cad"]),
    ("Business Analyst", &["business analysis", "sql", "excel", "data analysis", "tableau"]),
    ("Product Manager", &["product management", "agile", "scrum", "project management"]),
    ("Cloud Engineer", &["aws", "azure", "gcp", "cloud", "terraform"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_is_large_and_unique() {
        assert!(SKILLS.len() >= 100);
        for (i, s) in SKILLS.iter().enumerate() {
            assert!(
                SKILLS[i + 1..].iter().all(|other| other.name != s.name),
                "duplicate skill {}",
                s.name
            );
        }
    }

    #[test]
    fn test_role_signatures_reference_known_skills() {
        for (role, signature) in ROLE_SIGNATURES {
            for name in signature.iter() {
                assert!(lookup(name).is_some(), "{} references unknown skill {}", role, name);
            }
        }
    }

    #[test]
    fn test_skill_mentioned_by_alias() {
        let k8s = lookup("kubernetes").unwrap();
        assert!(k8s.mentioned_in("ran k8s clusters"));
        assert_eq!(k8s.category, SkillCategory::Cloud);
        let js = lookup("javascript").unwrap();
        assert!(!js.mentioned_in("jsonschema tooling"));
    }
}
