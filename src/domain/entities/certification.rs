use serde::Serialize;

/// A showcase entry. Authored here rather than stored in the database.
#[derive(Debug, Clone, Serialize)]
pub struct Certification {
    pub slug: &'static str,
    pub title: &'static str,
    pub issuer: &'static str,
    /// ISO date, `YYYY-MM-DD`.
    pub issued_on: &'static str,
    pub credential_id: Option<&'static str>,
    /// What started the journey.
    pub spark: &'static str,
    /// What it took.
    pub dedication: &'static str,
    /// What changed afterwards.
    pub breakthrough: &'static str,
    pub skills: &'static [&'static str],
    pub verification_url: Option<&'static str>,
    pub badge_image: Option<&'static str>,
}

static CERTIFICATIONS: &[Certification] = &[
    Certification {
        slug: "aws-cloud-practitioner",
        title: "AWS Certified Cloud Practitioner",
        issuer: "Amazon Web Services",
        issued_on: "2023-03-14",
        credential_id: None,
        spark: "A side project outgrew a single VPS and the bill stopped making sense.",
        dedication: "Six weeks of evening study, two practice exams a week and a lot of console clicking.",
        breakthrough: "Shared-responsibility and pricing models finally clicked, and the side project now costs less.",
        skills: &["AWS", "Cloud Architecture", "IAM", "Cost Optimization"],
        verification_url: Some("https://aws.amazon.com/verification"),
        badge_image: Some("/images/certs/aws-cloud-practitioner.png"),
    },
    Certification {
        slug: "comptia-security-plus",
        title: "CompTIA Security+",
        issuer: "CompTIA",
        issued_on: "2023-09-02",
        credential_id: None,
        spark: "A phishing simulation at work caught me, and that stung.",
        dedication: "Built a home lab, broke it repeatedly, and wrote notes for every port and protocol.",
        breakthrough: "Threat modelling became part of how I design features instead of an afterthought.",
        skills: &["Network Security", "Threat Modelling", "Cryptography", "Incident Response"],
        verification_url: Some("https://www.certmetrics.com/comptia/public/verification.aspx"),
        badge_image: Some("/images/certs/security-plus.png"),
    },
    Certification {
        slug: "linux-foundation-lfcs",
        title: "Linux Foundation Certified System Administrator",
        issuer: "The Linux Foundation",
        issued_on: "2024-02-20",
        credential_id: None,
        spark: "The terminal theme of this site started as a joke about living in a shell.",
        dedication: "Daily drills on systemd, storage and networking inside throwaway VMs.",
        breakthrough: "The shell stopped being a place I visit and became the place I work.",
        skills: &["Linux", "Bash", "systemd", "Networking"],
        verification_url: Some("https://training.linuxfoundation.org/certification/verify/"),
        badge_image: None,
    },
    Certification {
        slug: "postgresql-associate",
        title: "PostgreSQL Associate",
        issuer: "EDB",
        issued_on: "2024-07-11",
        credential_id: None,
        spark: "A slow blog query showed how little I knew about indexes.",
        dedication: "Read EXPLAIN output until it read back.",
        breakthrough: "Schema design now starts from the queries rather than the forms.",
        skills: &["PostgreSQL", "SQL", "Query Optimization"],
        verification_url: None,
        badge_image: None,
    },
];

/// Every certification, most recent first.
pub fn all_certifications() -> Vec<&'static Certification> {
    let mut certs: Vec<&'static Certification> = CERTIFICATIONS.iter().collect();
    certs.sort_by(|a, b| b.issued_on.cmp(a.issued_on));
    certs
}

pub fn find_certification(slug: &str) -> Option<&'static Certification> {
    CERTIFICATIONS.iter().find(|c| c.slug == slug)
}

pub fn certifications_with_skill(skill: &str) -> Vec<&'static Certification> {
    let needle = skill.trim().to_lowercase();
    all_certifications()
        .into_iter()
        .filter(|c| c.skills.iter().any(|s| s.to_lowercase() == needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = CERTIFICATIONS.iter().map(|c| c.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), CERTIFICATIONS.len());
    }

    #[test]
    fn listing_is_newest_first() {
        let certs = all_certifications();
        assert!(certs.windows(2).all(|w| w[0].issued_on >= w[1].issued_on));
    }

    #[test]
    fn skill_lookup_ignores_case() {
        let found = certifications_with_skill("linux");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "linux-foundation-lfcs");
        assert!(find_certification("missing").is_none());
    }
}
