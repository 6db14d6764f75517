use super::*;

/// One undo step for a write already applied.
enum CompensationStep {
    Application {
        previous: Application,
        written_revision: i64,
    },
    VirtualCluster {
        previous: VirtualCluster,
    },
}

/// Undo log replayed newest-first when a multi-step operation fails midway.
#[derive(Default)]
pub(super) struct CompensationLog {
    steps: Vec<CompensationStep>,
}

impl CompensationLog {
    /// Records that `previous` was replaced by a write now at `written_revision`.
    pub(super) fn application_written(&mut self, previous: Application, written_revision: i64) {
        self.steps.push(CompensationStep::Application {
            previous,
            written_revision,
        });
    }

    /// Records that a virtual cluster previously in `previous` state was written.
    pub(super) fn virtual_cluster_written(&mut self, previous: VirtualCluster) {
        let step = CompensationStep::VirtualCluster { previous };
        self.steps.push(step);
    }

    /// Restores every recorded write in reverse order and returns how many
    /// steps failed. Failed steps are logged and do not stop the replay.
    pub(super) async fn replay(self, catalog: &CatalogRepositories) -> usize {
        let mut failures = 0;
        for step in self.steps.into_iter().rev() {
            let result = match &step {
                CompensationStep::Application {
                    previous,
                    written_revision,
                } => catalog
                    .applications
                    .update_application(&previous.clone().with_revision(*written_revision))
                    .await
                    .map(|_| ()),
                CompensationStep::VirtualCluster { previous } => {
                    catalog
                        .virtual_clusters
                        .update_virtual_cluster(previous)
                        .await
                }
            };

            if let Err(error) = result {
                failures += 1;
                match step {
                    CompensationStep::Application { previous, .. } => error!(
                        %error,
                        application_id = %previous.id(),
                        "failed to restore application during rollback"
                    ),
                    CompensationStep::VirtualCluster { previous } => error!(
                        %error,
                        virtual_cluster_id = %previous.id(),
                        "failed to restore virtual cluster during rollback"
                    ),
                }
            }
        }
        failures
    }
}
