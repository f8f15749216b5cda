//! Canonical skill catalog with alias mapping and fuzzy search

use crate::jobs::JobDatabase;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Curated abbreviation and variant mappings, merged into the catalog on
/// load. Every canonical name also maps to itself, so lookup is a single
/// hash probe.
fn skill_aliases() -> Vec<(&'static str, &'static str)> {
    vec![
        // JavaScript variants
        ("js", "JavaScript"),
        ("javascript", "JavaScript"),
        ("es6", "JavaScript"),
        ("es2015", "JavaScript"),
        ("ecmascript", "JavaScript"),
        ("ts", "TypeScript"),
        ("typescript", "TypeScript"),
        // Python
        ("python3", "Python"),
        ("python 3", "Python"),
        ("py", "Python"),
        // Containers and orchestration
        ("k8s", "Kubernetes"),
        ("kube", "Kubernetes"),
        ("containerization", "Docker"),
        ("containers", "Docker"),
        // Databases
        ("postgres", "PostgreSQL"),
        ("postgresql", "PostgreSQL"),
        ("psql", "PostgreSQL"),
        ("mongo", "MongoDB"),
        ("mongodb", "MongoDB"),
        ("mysql", "MySQL"),
        ("mssql", "SQL Server"),
        ("sql server", "SQL Server"),
        // Cloud
        ("amazon web services", "AWS"),
        ("aws", "AWS"),
        ("google cloud platform", "GCP"),
        ("google cloud", "GCP"),
        ("gcp", "GCP"),
        ("azure", "Azure"),
        ("microsoft azure", "Azure"),
        // Frameworks
        ("reactjs", "React"),
        ("react.js", "React"),
        ("react js", "React"),
        ("react", "React"),
        ("vuejs", "Vue.js"),
        ("vue", "Vue.js"),
        ("vue.js", "Vue.js"),
        ("angularjs", "Angular"),
        ("angular.js", "Angular"),
        ("angular", "Angular"),
        ("nextjs", "Next.js"),
        ("next.js", "Next.js"),
        ("nodejs", "Node.js"),
        ("node.js", "Node.js"),
        ("node", "Node.js"),
        ("expressjs", "Express.js"),
        ("express.js", "Express.js"),
        ("express", "Express.js"),
        ("fastapi", "FastAPI"),
        ("django", "Django"),
        ("flask", "Flask"),
        ("spring boot", "Spring Boot"),
        ("springboot", "Spring Boot"),
        // APIs
        ("rest api", "REST APIs"),
        ("rest apis", "REST APIs"),
        ("restful", "REST APIs"),
        ("restful api", "REST APIs"),
        ("graphql", "GraphQL"),
        ("grpc", "gRPC"),
        ("websocket", "WebSockets"),
        ("websockets", "WebSockets"),
        // ML/AI
        ("machine learning", "Machine Learning"),
        ("ml", "Machine Learning"),
        ("deep learning", "Deep Learning"),
        ("dl", "Deep Learning"),
        ("artificial intelligence", "AI"),
        ("ai", "AI"),
        ("natural language processing", "NLP"),
        ("nlp", "NLP"),
        // Version control
        ("git", "Git"),
        ("github", "GitHub"),
        ("gitlab", "GitLab"),
        ("bitbucket", "Bitbucket"),
        // CI/CD
        ("ci/cd", "CI/CD"),
        ("cicd", "CI/CD"),
        ("continuous integration", "CI/CD"),
        ("jenkins", "Jenkins"),
        ("github actions", "GitHub Actions"),
        // Languages
        ("c#", "C#"),
        ("csharp", "C#"),
        ("c sharp", "C#"),
        ("c++", "C++"),
        ("cpp", "C++"),
        ("cplusplus", "C++"),
        ("golang", "Go"),
        ("go", "Go"),
        ("rust", "Rust"),
        ("java", "Java"),
        ("kotlin", "Kotlin"),
        ("swift", "Swift"),
        ("ruby", "Ruby"),
        ("php", "PHP"),
        ("scala", "Scala"),
        // Testing
        ("unit testing", "Unit Testing"),
        ("unit tests", "Unit Testing"),
        ("unittest", "Unit Testing"),
        ("pytest", "Pytest"),
        ("jest", "Jest"),
        ("mocha", "Mocha"),
        ("selenium", "Selenium"),
        ("cypress", "Cypress"),
        // Data
        ("pandas", "Pandas"),
        ("numpy", "NumPy"),
        ("scipy", "SciPy"),
        ("tensorflow", "TensorFlow"),
        ("tf", "TensorFlow"),
        ("pytorch", "PyTorch"),
        ("torch", "PyTorch"),
        ("scikit-learn", "Scikit-learn"),
        ("sklearn", "Scikit-learn"),
        // DevOps
        ("docker", "Docker"),
        ("kubernetes", "Kubernetes"),
        ("terraform", "Terraform"),
        ("ansible", "Ansible"),
        ("puppet", "Puppet"),
        ("chef", "Chef"),
        // Messaging
        ("kafka", "Apache Kafka"),
        ("rabbitmq", "RabbitMQ"),
        ("redis", "Redis"),
        // Frontend and misc
        ("html5", "HTML"),
        ("html", "HTML"),
        ("css3", "CSS"),
        ("css", "CSS"),
        ("sass", "SASS"),
        ("scss", "SASS"),
        ("less", "LESS"),
        ("tailwind", "Tailwind CSS"),
        ("tailwindcss", "Tailwind CSS"),
        ("tailwind css", "Tailwind CSS"),
        ("bootstrap", "Bootstrap"),
        ("jquery", "jQuery"),
        ("webpack", "Webpack"),
        ("vite", "Vite"),
        ("babel", "Babel"),
        ("eslint", "ESLint"),
        ("prettier", "Prettier"),
        ("linux", "Linux"),
        ("unix", "Unix"),
        ("bash", "Bash"),
        ("shell", "Shell Scripting"),
        ("powershell", "PowerShell"),
    ]
}

/// Canonical skill catalog plus lowercase alias table.
///
/// Immutable after construction; O(1) normalization lookups. A failed
/// dataset load leaves the catalog in degraded alias-only mode rather than
/// failing extraction.
pub struct SkillTaxonomy {
    skills: HashSet<String>,
    lower_map: HashMap<String, String>,
}

impl SkillTaxonomy {
    /// Build the taxonomy from the job dataset, merging the static alias
    /// table. Loader failure is non-fatal.
    pub fn load(data_path: &Path) -> Self {
        match JobDatabase::load(data_path) {
            Ok(db) => {
                let taxonomy = Self::from_skills(db.all_skills());
                info!("Taxonomy loaded with {} skills", taxonomy.skill_count());
                taxonomy
            }
            Err(e) => {
                warn!(
                    "Taxonomy source unavailable ({}), degraded mode: \
                     only the curated alias table will match",
                    e
                );
                Self::empty()
            }
        }
    }

    /// An empty taxonomy: every lookup misses, fuzzy search has no corpus.
    pub fn empty() -> Self {
        Self {
            skills: HashSet::new(),
            lower_map: HashMap::new(),
        }
    }

    /// Build from an explicit skill list (plus the static alias table).
    pub fn from_skills<'a, I>(dataset_skills: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut skills = HashSet::new();
        let mut lower_map = HashMap::new();

        for skill in dataset_skills {
            let canonical = skill.trim();
            if canonical.is_empty() {
                continue;
            }
            lower_map.insert(canonical.to_lowercase(), canonical.to_string());
            skills.insert(canonical.to_string());
        }

        for (alias, canonical) in skill_aliases() {
            lower_map.insert(alias.to_lowercase(), canonical.to_string());
            if !skills.contains(canonical) {
                skills.insert(canonical.to_string());
                lower_map.insert(canonical.to_lowercase(), canonical.to_string());
            }
        }

        Self { skills, lower_map }
    }

    /// Normalize a skill name to its canonical form, if known.
    pub fn normalize(&self, skill: &str) -> Option<&str> {
        if skill.trim().is_empty() {
            return None;
        }
        let cleaned = skill
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.lower_map.get(&cleaned).map(|s| s.as_str())
    }

    pub fn is_known_skill(&self, skill: &str) -> bool {
        self.normalize(skill).is_some()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Iterate over all canonical skill names.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.as_str())
    }

    /// Fuzzy catalog search for suggestions, best matches first.
    pub fn search_similar(&self, query: &str, limit: usize) -> Vec<String> {
        const MIN_SIMILARITY: f64 = 0.7;

        let query = query.trim().to_lowercase();
        if query.is_empty() || self.skills.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &String)> = self
            .skills
            .iter()
            .map(|skill| (strsim::jaro_winkler(&query, &skill.to_lowercase()), skill))
            .filter(|(score, _)| *score >= MIN_SIMILARITY)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(limit).map(|(_, s)| s.clone()).collect()
    }
}
