// Temporal clusters and namespaces managed by the temporal-operator.

use super::DataSource;
use crate::schema::*;
use crate::types::CrdIdentity;

const GROUP: &str = "temporal.io";
const VERSION: &str = "v1beta1";

pub fn data_sources() -> Vec<DataSource> {
    vec![temporal_cluster(), temporal_namespace(), temporal_cluster_client()]
}

fn cluster_reference() -> Field {
    object(
        "clusterRef",
        vec![
            string("name").required().doc("The name of the TemporalCluster to reference."),
            string("namespace").doc("The namespace of the TemporalCluster to reference. Defaults to the namespace of the requested resource if omitted."),
        ],
    )
    .required()
    .doc("Reference to the temporal cluster the resource will be registered in.")
}

fn secret_key_ref(name: &'static str) -> Field {
    object(name, vec![string("key").required(), string("name")])
}

fn datastore(name: &'static str) -> Field {
    object(
        name,
        vec![
            object(
                "cassandra",
                vec![
                    string_list("hosts").required(),
                    string("keyspace").required(),
                    integer("port").required(),
                    string("datacenter").required(),
                    integer("maxConns"),
                    string("user"),
                    boolean("disableInitialHostLookup"),
                ],
            ),
            object(
                "elasticsearch",
                vec![
                    string("version"),
                    string("url").required(),
                    string("username"),
                    object("indices", vec![string("visibility"), string("secondaryVisibility")]),
                    string("logLevel"),
                    string("closeIdleConnectionsInterval"),
                    boolean("enableSniff"),
                    boolean("enableHealthcheck"),
                ],
            ),
            string("name").required(),
            secret_key_ref("passwordSecretRef"),
            boolean("skipCreate"),
            object(
                "sql",
                vec![
                    string("user").required(),
                    string("pluginName").required(),
                    string("databaseName").required(),
                    string("connectAddr").required(),
                    string("connectProtocol"),
                    string_map("connectAttributes"),
                    integer("maxConns"),
                    integer("maxIdleConns"),
                    string("maxConnLifetime"),
                    string("taskScanPartitions"),
                    string("gcpServiceAccount"),
                ],
            ),
            object(
                "tls",
                vec![
                    boolean("enabled"),
                    secret_key_ref("caFileRef"),
                    secret_key_ref("certFileRef"),
                    secret_key_ref("keyFileRef"),
                    boolean("enableHostVerification"),
                    string("serverName"),
                ],
            ),
        ],
    )
}

fn service(name: &'static str) -> Field {
    object(
        name,
        vec![
            bounded("replicas", Some(0), None).doc("Number of desired replicas for the service."),
            integer("port").doc("Port defines a custom gRPC port for the service."),
            integer("membershipPort").doc("MembershipPort defines a custom membership port for the service."),
            integer("httpPort").doc("HTTPPort defines a custom http port for the service."),
            any("resources").doc("Compute Resources required by this service."),
            any("overrides").doc("Overrides adds some overrides to the resources deployed for this temporal service."),
            Field::new("initContainers", FieldType::List(Box::new(FieldType::Any))),
        ],
    )
}

fn temporal_cluster() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "TemporalCluster"),
        description: "A TemporalCluster defines a temporal cluster deployment.",
        emits_id: false,
        spec: vec![
            object(
                "admintools",
                vec![
                    boolean("enabled"),
                    string("image"),
                    string("version"),
                    any("resources"),
                    any("overrides"),
                ],
            )
            .doc("AdminTools allows configuration of the optional admin tool pod deployed alongside the cluster."),
            object(
                "archival",
                vec![
                    boolean("enabled"),
                    enumeration("provider", &["filestore", "s3", "gcs"]),
                    object("history", vec![boolean("enabled"), boolean("enableRead"), string("path").required()]),
                    object("visibility", vec![boolean("enabled"), boolean("enableRead"), string("path").required()]),
                ],
            ),
            object(
                "authorization",
                vec![
                    string("authorizer"),
                    string("claimMapper"),
                    string("permissionsClaimName"),
                    object(
                        "jwtKeyProvider",
                        vec![string_list("keySourceURIs"), string("refreshInterval")],
                    ),
                ],
            ),
            object(
                "dynamicConfig",
                vec![
                    string("pollInterval").doc("PollInterval defines how often the config should be updated by checking provided values."),
                    Field::new(
                        "values",
                        FieldType::Map(Box::new(FieldType::List(Box::new(FieldType::Object(vec![
                            any("value").required(),
                            any("constraints"),
                        ]))))),
                    ),
                ],
            )
            .doc("Dynamic config for the cluster."),
            string("image").doc("Image defines the temporal server docker image the cluster should use for each services."),
            object_list("imagePullSecrets", vec![string("name")]),
            object(
                "log",
                vec![
                    boolean("development"),
                    enumeration("format", &["json", "console"]),
                    enumeration("level", &["debug", "info", "warn", "error", "dpanic", "panic", "fatal"]),
                    string("outputFile"),
                    boolean("stdout"),
                ],
            ),
            object(
                "metrics",
                vec![
                    boolean("enabled").required(),
                    object(
                        "prometheus",
                        vec![
                            string("listenAddress"),
                            bounded("listenPort", Some(1), Some(65535)),
                            object(
                                "scrapeConfig",
                                vec![boolean("annotations"), object("serviceMonitor", vec![boolean("enabled"), string_map("labels")])],
                            ),
                        ],
                    ),
                    string_map("excludeTags"),
                    string("prefix"),
                    boolean("perUnitHistogramBoundaries"),
                ],
            ),
            object(
                "mTLS",
                vec![
                    enumeration("provider", &["cert-manager", "linkerd", "istio"]),
                    object("frontend", vec![boolean("enabled")]),
                    object("internode", vec![boolean("enabled")]),
                    string("refreshInterval"),
                    object(
                        "certificatesDuration",
                        vec![
                            string("rootCACertificate"),
                            string("intermediateCAsCertificates"),
                            string("clientCertificates"),
                            string("frontendCertificate"),
                            string("internodeCertificate"),
                        ],
                    ),
                ],
            ),
            bounded("numHistoryShards", Some(1), None)
                .required()
                .doc("NumHistoryShards is the desired number of history shards. This field is immutable."),
            object(
                "persistence",
                vec![
                    datastore("defaultStore").required(),
                    datastore("visibilityStore"),
                    datastore("advancedVisibilityStore"),
                    datastore("secondaryVisibilityStore"),
                ],
            )
            .required()
            .doc("Persistence defines temporal persistence configuration."),
            object(
                "services",
                vec![service("frontend"), service("internalFrontend"), service("history"), service("matching"), service("worker")],
            ),
            object(
                "ui",
                vec![
                    boolean("enabled"),
                    string("image"),
                    string("version"),
                    integer("replicas"),
                    object(
                        "ingress",
                        vec![string_map("annotations"), string("ingressClassName"), string_list("hosts").required(), any("tls")],
                    ),
                    any("resources"),
                    any("overrides"),
                ],
            ),
            string("version").required().doc("Version defines the temporal version the cluster to be deployed."),
            bounded("jobTtlSecondsAfterFinished", Some(0), None),
            string("serviceAccountName"),
        ],
    }
}

fn temporal_namespace() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "TemporalNamespace"),
        description: "A TemporalNamespace creates a namespace in the targeted temporal cluster.",
        emits_id: false,
        spec: vec![
            string("activeClusterName").doc("The name of active Temporal Cluster. Only applicable if the namespace is a global namespace."),
            boolean("allowDeletion").doc("AllowDeletion makes the controller delete the Temporal namespace if the CRD is deleted."),
            object(
                "archival",
                vec![
                    object("history", vec![boolean("enabled").required(), string("path").required(), boolean("paused")]),
                    object("visibility", vec![boolean("enabled").required(), string("path").required(), boolean("paused")]),
                ],
            ),
            cluster_reference(),
            string_list("clusters").doc("List of clusters names to which the namespace can fail over."),
            string_map("data").doc("Data is a key-value map for any customized purpose."),
            string("description").doc("Namespace description."),
            boolean("isGlobalNamespace"),
            string("ownerEmail").doc("Namespace owner email."),
            string("retentionPeriod")
                .required()
                .doc("RetentionPeriod to apply on closed workflow executions."),
            any("securityToken"),
        ],
    }
}

fn temporal_cluster_client() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "TemporalClusterClient"),
        description: "A TemporalClusterClient creates a new mTLS client in the targeted temporal cluster.",
        emits_id: false,
        spec: vec![cluster_reference()],
    }
}
