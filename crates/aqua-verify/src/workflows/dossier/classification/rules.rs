use super::super::domain::DocumentType;

/// Keyword lists scored in the weighted tier. All entries are lowercase.
pub(crate) struct KeywordRule {
    pub filename: &'static [&'static str],
    pub content: &'static [&'static str],
}

impl KeywordRule {
    pub(crate) fn checks(&self) -> usize {
        self.filename.len() + self.content.len()
    }
}

pub(crate) fn keyword_rule(document_type: DocumentType) -> Option<&'static KeywordRule> {
    use DocumentType::*;
    let rule = match document_type {
        Pc1 => &PC1,
        Pc2 => &PC2,
        Pc3 => &PC3,
        Pc4 => &PC4,
        Pc5 => &PC5,
        Pc6 => &PC6,
        Pc7 => &PC7,
        Pc8 => &PC8,
        Pa1 => &PA1,
        Pa2 => &PA2,
        Pa3 => &PA3,
        Pa4 => &PA4,
        Pa5 => &PA5,
        Pa6 => &PA6,
        Pa7 => &PA7,
        Pa8 => &PA8,
        Pa9 => &PA9,
        Cerfa => &CERFA,
        AvisEp => &AVIS_EP,
        AvisDea => &AVIS_DEA,
        PlanRuissellement => &PLAN_RUISSELLEMENT,
        NoteCalculDea => &NOTE_CALCUL_DEA,
        TestInfiltration => &TEST_INFILTRATION,
        TestPermeabilite => &TEST_PERMEABILITE,
        CoupeBassin => &COUPE_BASSIN,
        Autre => return None,
    };
    Some(rule)
}

/// Phrases distinctive enough to decide the type on their own, checked in order.
pub(crate) const STRONG_PHRASES: &[(&str, DocumentType)] = &[
    ("notice descriptive", DocumentType::Pc4),
    ("notice descriptive", DocumentType::Pa2),
    ("note de calcul", DocumentType::NoteCalculDea),
    ("essai porchet", DocumentType::TestPermeabilite),
    ("test de perméabilité", DocumentType::TestPermeabilite),
    ("essai de perméabilité", DocumentType::TestPermeabilite),
    ("test d'infiltration", DocumentType::TestInfiltration),
    ("essai d'infiltration", DocumentType::TestInfiltration),
    ("coupe du bassin", DocumentType::CoupeBassin),
    ("plan de ruissellement", DocumentType::PlanRuissellement),
    ("carte de ruissellement", DocumentType::PlanRuissellement),
    ("plan en coupe", DocumentType::Pc3),
    ("plan en coupe", DocumentType::Pa5),
    ("coupe transversale", DocumentType::Pc3),
    ("coupe transversale", DocumentType::Pa5),
    ("vues et coupes", DocumentType::Pa5),
    ("plan de masse", DocumentType::Pc2),
    ("plan de composition", DocumentType::Pa4),
];

/// Filename fragments identifying the official application form.
pub(crate) const FORM_FILENAME_MARKERS: &[&str] = &["cerfa", "formulaire"];

const PC1: KeywordRule = KeywordRule {
    filename: &["pc1", "situation", "localisation"],
    content: &[
        "plan de situation",
        "situation du terrain",
        "localisation",
        "extrait cadastral",
        "cadastre",
    ],
};

const PC2: KeywordRule = KeywordRule {
    filename: &["pc2", "masse", "implantation"],
    content: &[
        "plan de masse",
        "plan masse",
        "implantation",
        "emprise au sol",
        "limites de propriété",
        "voirie",
        "réseaux",
    ],
};

const PC3: KeywordRule = KeywordRule {
    filename: &["pc3", "coupe", "profil"],
    content: &[
        "plan en coupe",
        "coupe du terrain",
        "profil",
        "altimétrie",
        "niveau du sol",
        "terrain naturel",
    ],
};

const PC4: KeywordRule = KeywordRule {
    filename: &["pc4", "notice", "descriptif", "description"],
    content: &[
        "notice descriptive",
        "notice explicative",
        "description du terrain",
        "présentation du projet",
        "état initial",
        "projet architectural",
    ],
};

const PC5: KeywordRule = KeywordRule {
    filename: &["pc5", "facade", "façade", "toiture", "elevation"],
    content: &[
        "plan des façades",
        "façades",
        "toitures",
        "élévation",
        "vue de face",
        "pignon",
    ],
};

const PC6: KeywordRule = KeywordRule {
    filename: &["pc6", "insertion", "integration", "3d", "perspective"],
    content: &[
        "insertion",
        "intégration",
        "document graphique",
        "perspective",
        "simulation",
        "photomontage",
    ],
};

const PC7: KeywordRule = KeywordRule {
    filename: &["pc7", "photo", "environnement", "proche"],
    content: &[
        "photographie",
        "environnement proche",
        "vue rapprochée",
        "abords immédiats",
    ],
};

const PC8: KeywordRule = KeywordRule {
    filename: &["pc8", "photo", "paysage", "lointain"],
    content: &[
        "photographie",
        "paysage lointain",
        "vue éloignée",
        "environnement large",
    ],
};

const PA1: KeywordRule = KeywordRule {
    filename: &["pa1", "situation", "localisation"],
    content: &[
        "plan de situation",
        "situation du terrain",
        "localisation",
        "extrait cadastral",
        "cadastre",
    ],
};

const PA2: KeywordRule = KeywordRule {
    filename: &["pa2", "notice"],
    content: &[
        "notice",
        "projet d'aménagement",
        "état initial du terrain",
        "parti d'aménagement",
        "présentation du projet",
    ],
};

const PA3: KeywordRule = KeywordRule {
    filename: &["pa3", "etat actuel", "état actuel", "existant"],
    content: &[
        "état actuel",
        "plan de l'état actuel",
        "abords",
        "constructions existantes",
        "végétation existante",
    ],
};

const PA4: KeywordRule = KeywordRule {
    filename: &["pa4", "composition", "masse"],
    content: &[
        "plan de composition",
        "composition d'ensemble",
        "lots",
        "voies",
        "espaces verts",
        "coté dans les trois dimensions",
    ],
};

const PA5: KeywordRule = KeywordRule {
    filename: &["pa5", "coupe", "profil"],
    content: &[
        "vues et coupes",
        "coupe",
        "profil en travers",
        "terrain naturel",
        "altimétrie",
    ],
};

const PA6: KeywordRule = KeywordRule {
    filename: &["pa6", "photo", "proche"],
    content: &["photographie", "environnement proche", "vue rapprochée"],
};

const PA7: KeywordRule = KeywordRule {
    filename: &["pa7", "photo", "lointain", "paysage"],
    content: &["photographie", "paysage lointain", "vue éloignée"],
};

const PA8: KeywordRule = KeywordRule {
    filename: &["pa8", "programme", "travaux", "equipement"],
    content: &[
        "programme des travaux",
        "travaux d'équipement",
        "plans des travaux",
        "réseaux",
        "voirie",
    ],
};

const PA9: KeywordRule = KeywordRule {
    filename: &["pa9", "hypothetique", "hypothétique"],
    content: &[
        "document graphique",
        "hypothèse d'implantation",
        "implantation des bâtiments",
        "hypothétique",
    ],
};

const CERFA: KeywordRule = KeywordRule {
    filename: &["cerfa", "formulaire"],
    content: &[
        "cerfa",
        "demande de permis",
        "permis de construire",
        "code de l'urbanisme",
        "déclaration préalable",
        "n° 13406",
        "n° 13409",
    ],
};

const AVIS_EP: KeywordRule = KeywordRule {
    filename: &["avis_ep", "avis ep", "eaux pluviales", "pluvial"],
    content: &[
        "eaux pluviales",
        "gestion des eaux",
        "infiltration",
        "rétention",
        "bassin",
    ],
};

const AVIS_DEA: KeywordRule = KeywordRule {
    filename: &["avis_dea", "dea", "assainissement"],
    content: &[
        "direction de l'eau",
        "assainissement",
        "raccordement",
        "eaux usées",
    ],
};

const PLAN_RUISSELLEMENT: KeywordRule = KeywordRule {
    filename: &["ruissellement", "bassin versant", "ecoulement"],
    content: &[
        "ruissellement",
        "bassin versant",
        "sens d'écoulement",
        "axe d'écoulement",
        "exutoire",
    ],
};

const NOTE_CALCUL_DEA: KeywordRule = KeywordRule {
    filename: &["note_calcul", "note de calcul", "dimensionnement", "calcul"],
    content: &[
        "note de calcul",
        "dimensionnement",
        "volume de rétention",
        "débit de fuite",
        "coefficient de ruissellement",
    ],
};

const TEST_INFILTRATION: KeywordRule = KeywordRule {
    filename: &["infiltration", "essai", "test"],
    content: &[
        "test d'infiltration",
        "essai d'infiltration",
        "capacité d'infiltration",
        "vitesse d'infiltration",
    ],
};

const TEST_PERMEABILITE: KeywordRule = KeywordRule {
    filename: &["permeabilite", "perméabilité", "porchet"],
    content: &[
        "perméabilité",
        "essai porchet",
        "coefficient de perméabilité",
        "mm/h",
        "sondage",
    ],
};

const COUPE_BASSIN: KeywordRule = KeywordRule {
    filename: &["bassin", "coupe bassin", "retention"],
    content: &[
        "coupe bassin",
        "bassin de rétention",
        "ouvrage de stockage",
        "volume de stockage",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_identifiable_type_has_lowercase_keywords() {
        for document_type in DocumentType::ordered() {
            match keyword_rule(document_type) {
                Some(rule) => {
                    assert!(rule.checks() > 0, "{document_type} has no keywords");
                    for keyword in rule.filename.iter().chain(rule.content.iter()) {
                        assert_eq!(*keyword, keyword.to_lowercase(), "{keyword} not lowercase");
                    }
                }
                None => assert_eq!(document_type, DocumentType::Autre),
            }
        }
    }
}
