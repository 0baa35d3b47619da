//! Object/type registry.
//!
//! Static tables mapping logical object names (e.g. `feature`) to backend
//! collections, primary ID columns and default field lists. Built once on
//! first use and never mutated. A missing entry is not an error; callers
//! supply their own fallback.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A field resolved through a second collection:
/// `record[source_key]` is looked up as `target_table.target_key`, yielding `target_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedField {
    pub source_key: &'static str,
    pub target_table: &'static str,
    pub target_key: &'static str,
    pub target_value: &'static str,
}

/// A field computed client-side by `function` from `sources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedField {
    pub function: &'static str,
    pub sources: &'static [&'static str],
}

static OBJECTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("genome", "genome"),
        ("feature", "genome_feature"),
        ("family", "protein_family_ref"),
        ("genome_drug", "genome_amr"),
        ("contig", "genome_sequence"),
        ("drug", "antibiotics"),
        ("taxonomy", "taxonomy"),
        ("experiment", "transcriptomics_experiment"),
        ("expression", "transcriptomics_gene"),
        ("sample", "transcriptomics_sample"),
        ("sequence", "feature_sequence"),
        ("subsystem", "subsystem_ref"),
        ("subsystemItem", "subsystem"),
        ("alt_feature", "genome_feature"),
        ("sp_gene", "sp_gene"),
        ("protein_region", "protein_feature"),
        ("protein_structure", "protein_structure"),
        ("surveillance", "surveillance"),
        ("serology", "serology"),
        ("sf", "sequence_feature"),
        ("sfvt", "sequence_feature_vt"),
    ])
});

static ID_COLUMNS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("genome", "genome_id"),
        ("feature", "patric_id"),
        ("alt_feature", "feature_id"),
        ("family", "family_id"),
        ("genome_drug", "id"),
        ("contig", "sequence_id"),
        ("drug", "antibiotic_name"),
        ("experiment", "eid"),
        ("sample", "expid"),
        ("expression", "id"),
        ("taxonomy", "taxon_id"),
        ("sequence", "md5"),
        ("sp_gene", "patric_id"),
        ("subsystem", "subsystem_id"),
        ("subsystemItem", "id"),
        ("protein_region", "id"),
        ("protein_structure", "pdb_id"),
        ("surveillance", "sample_identifier"),
        ("serology", "sample_identifier"),
        ("sf", "sf_id"),
        ("sfvt", "id"),
    ])
});

static DEFAULT_FIELDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert(
        "genome",
        &[
            "genome_name",
            "genome_id",
            "genome_status",
            "sequences",
            "patric_cds",
            "isolation_country",
            "host_name",
            "disease",
            "collection_year",
            "completion_date",
        ],
    );
    map.insert(
        "feature",
        &[
            "patric_id",
            "refseq_locus_tag",
            "gene_id",
            "plfam_id",
            "pgfam_id",
            "product",
        ],
    );
    map.insert("alt_feature", &["feature_id", "refseq_locus_tag", "gene_id", "product"]);
    map.insert("family", &["family_id", "family_type", "family_product"]);
    map.insert("genome_drug", &["genome_id", "antibiotic", "resistant_phenotype"]);
    map.insert(
        "contig",
        &[
            "genome_id",
            "accession",
            "length",
            "gc_content",
            "sequence_type",
            "topology",
        ],
    );
    map.insert("drug", &["cas_id", "antibiotic_name", "canonical_smiles"]);
    map.insert(
        "experiment",
        &[
            "eid",
            "title",
            "genes",
            "pmid",
            "organism",
            "strain",
            "mutant",
            "timeseries",
            "release_date",
        ],
    );
    map.insert(
        "sample",
        &[
            "eid",
            "expid",
            "genes",
            "sig_log_ratio",
            "sig_z_score",
            "pmid",
            "organism",
            "strain",
            "mutant",
            "condition",
            "timepoint",
            "release_date",
        ],
    );
    map.insert(
        "expression",
        &[
            "id",
            "eid",
            "genome_id",
            "patric_id",
            "refseq_locus_tag",
            "alt_locus_tag",
            "log_ratio",
            "z_score",
        ],
    );
    map.insert(
        "taxonomy",
        &[
            "taxon_id",
            "taxon_name",
            "taxon_rank",
            "genome_count",
            "genome_length_mean",
        ],
    );
    map.insert("sequence", &["md5", "sequence_type", "sequence"]);
    map.insert(
        "sp_gene",
        &[
            "evidence",
            "property",
            "patric_id",
            "refseq_locus_tag",
            "source_id",
            "gene",
            "product",
            "pmid",
            "identity",
            "e_value",
        ],
    );
    map.insert("subsystem", &["subsystem_id", "subsystem_name", "superclass", "class", "subclass"]);
    map.insert(
        "subsystemItem",
        &[
            "id",
            "subsystem_name",
            "superclass",
            "class",
            "subclass",
            "role_name",
            "active",
            "patric_id",
            "gene",
            "product",
        ],
    );
    map.insert(
        "protein_region",
        &[
            "patric_id",
            "refseq_locus_tag",
            "gene",
            "product",
            "source",
            "source_id",
            "description",
            "e_value",
            "evidence",
        ],
    );
    map.insert(
        "protein_structure",
        &[
            "pdb_id",
            "title",
            "organism_name",
            "patric_id",
            "uniprotkb_accession",
            "gene",
            "product",
            "method",
            "release_date",
        ],
    );
    map.insert(
        "surveillance",
        &[
            "sample_identifier",
            "sample_material",
            "collector_institution",
            "collection_year",
            "collection_country",
            "pathogen_test_type",
            "pathogen_test_result",
            "type",
            "subtype",
            "strain",
            "host_identifier",
            "host_species",
            "host_common_name",
            "host_age",
            "host_health",
        ],
    );
    map.insert(
        "serology",
        &[
            "sample_identifier",
            "host_identifier",
            "host_type",
            "host_species",
            "host_common_name",
            "host_sex",
            "host_age",
            "host_age_group",
            "host_health",
            "collection_date",
            "test_type",
            "test_result",
            "serotype",
        ],
    );
    map.insert(
        "sf",
        &[
            "sf_id",
            "sf_name",
            "sf_category",
            "gene",
            "length",
            "start",
            "end",
            "source_strain",
        ],
    );
    map.insert(
        "sfvt",
        &[
            "sf_id",
            "sf_name",
            "sf_category",
            "sfvt_id",
            "sfvt_genome_count",
            "sfvt_sequence",
        ],
    );
    map
});

static FAMILY_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("plfam", "plfam_id"),
        ("pgfam", "pgfam_id"),
        ("figfam", "figfam_id"),
        ("fig", "figfam_id"),
    ])
});

static FEATURE_TYPE_ALIASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("CDS", "peg")]));

const NA_SEQUENCE: RelatedField = RelatedField {
    source_key: "na_sequence_md5",
    target_table: "feature_sequence",
    target_key: "md5",
    target_value: "sequence",
};

const AA_SEQUENCE: RelatedField = RelatedField {
    source_key: "aa_sequence_md5",
    target_table: "feature_sequence",
    target_key: "md5",
    target_value: "sequence",
};

const PATHWAY: RelatedField = RelatedField {
    source_key: "patric_id",
    target_table: "pathway",
    target_key: "patric_id",
    target_value: "pathway_name",
};

const SUBSYSTEM: RelatedField = RelatedField {
    source_key: "patric_id",
    target_table: "subsystem",
    target_key: "patric_id",
    target_value: "subsystem_name",
};

type FieldTable<T> = HashMap<&'static str, HashMap<&'static str, T>>;

static RELATED_FIELDS: Lazy<FieldTable<RelatedField>> = Lazy::new(|| {
    let feature = HashMap::from([
        ("na_sequence", NA_SEQUENCE),
        ("aa_sequence", AA_SEQUENCE),
        ("pathway", PATHWAY),
        ("subsystem", SUBSYSTEM),
    ]);
    let genetic_code = RelatedField {
        source_key: "taxon_id",
        target_table: "taxonomy",
        target_key: "taxon_id",
        target_value: "genetic_code",
    };
    HashMap::from([
        ("feature", feature.clone()),
        ("alt_feature", feature),
        ("genome", HashMap::from([("genetic_code", genetic_code)])),
        ("protein", HashMap::from([("aa_sequence", AA_SEQUENCE)])),
    ])
});

static DERIVED_FIELDS: Lazy<FieldTable<DerivedField>> = Lazy::new(|| {
    let feature = HashMap::from([
        (
            "function",
            DerivedField {
                function: "altName",
                sources: &["product"],
            },
        ),
        (
            "ec",
            DerivedField {
                function: "ecParse",
                sources: &["product"],
            },
        ),
    ]);
    let taxonomy = DerivedField {
        function: "concatSemi",
        sources: &["taxon_lineage_names"],
    };
    let md5 = DerivedField {
        function: "md5",
        sources: &["sequence"],
    };
    HashMap::from([
        ("genome", HashMap::from([("taxonomy", taxonomy)])),
        ("feature", feature.clone()),
        ("alt_feature", feature),
        ("contig", HashMap::from([("md5", md5)])),
    ])
});

/// Backend collection for an object name; unknown names pass through unchanged.
pub fn object_type(name: &str) -> &str {
    OBJECTS.get(name).copied().unwrap_or(name)
}

/// Primary ID column, or `""` for unknown object names.
pub fn id_column(object: &str) -> &'static str {
    ID_COLUMNS.get(object).copied().unwrap_or("")
}

/// Default field list, or an empty slice for unknown object names.
pub fn default_fields(object: &str) -> &'static [&'static str] {
    DEFAULT_FIELDS.get(object).copied().unwrap_or(&[])
}

/// ID field for a protein family type (`plfam`, `pgfam`, `figfam`).
pub fn family_field_of_type(family_type: &str) -> Option<&'static str> {
    FAMILY_FIELDS.get(family_type).copied()
}

/// Common name for a feature type (`CDS` is reported as `peg`).
pub fn feature_type_alias(feature_type: &str) -> Option<&'static str> {
    FEATURE_TYPE_ALIASES.get(feature_type).copied()
}

pub fn related_field(object: &str, field: &str) -> Option<RelatedField> {
    RELATED_FIELDS.get(object)?.get(field).copied()
}

pub fn derived_field(object: &str, field: &str) -> Option<DerivedField> {
    DERIVED_FIELDS.get(object)?.get(field).copied()
}

/// Whether a derived field may produce several values per record.
pub fn is_multi_valued(object: &str, field: &str) -> bool {
    matches!(object, "feature" | "alt_feature") && matches!(field, "ec" | "subsystem" | "pathway")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type() {
        assert_eq!(object_type("genome"), "genome");
        assert_eq!(object_type("feature"), "genome_feature");
        assert_eq!(object_type("contig"), "genome_sequence");
        assert_eq!(object_type("unknown"), "unknown");
    }

    #[test]
    fn test_id_column() {
        assert_eq!(id_column("genome"), "genome_id");
        assert_eq!(id_column("feature"), "patric_id");
        assert_eq!(id_column("contig"), "sequence_id");
        assert_eq!(id_column("unknown"), "");
    }

    #[test]
    fn test_default_fields() {
        let fields = default_fields("genome");
        assert_eq!(fields.first(), Some(&"genome_name"));
        assert!(fields.contains(&"genome_id"));
        assert!(default_fields("unknown").is_empty());
    }

    #[test]
    fn test_every_object_has_an_id_column() {
        for name in OBJECTS.keys() {
            assert!(!id_column(name).is_empty(), "{name} has no id column");
        }
    }

    #[test]
    fn test_family_and_feature_type() {
        assert_eq!(family_field_of_type("pgfam"), Some("pgfam_id"));
        assert_eq!(family_field_of_type("fig"), Some("figfam_id"));
        assert_eq!(family_field_of_type("nope"), None);
        assert_eq!(feature_type_alias("CDS"), Some("peg"));
        assert_eq!(feature_type_alias("tRNA"), None);
    }

    #[test]
    fn test_related_and_derived_fields() {
        let rel = related_field("feature", "aa_sequence").unwrap();
        assert_eq!(rel.target_table, "feature_sequence");
        assert_eq!(rel.source_key, "aa_sequence_md5");
        assert_eq!(
            related_field("genome", "genetic_code").map(|r| r.target_value),
            Some("genetic_code")
        );
        assert!(related_field("genome", "aa_sequence").is_none());

        let derived = derived_field("alt_feature", "ec").unwrap();
        assert_eq!(derived.function, "ecParse");
        assert_eq!(derived.sources, ["product"]);
        assert!(derived_field("taxonomy", "ec").is_none());

        assert!(is_multi_valued("feature", "pathway"));
        assert!(!is_multi_valued("genome", "pathway"));
    }
}
