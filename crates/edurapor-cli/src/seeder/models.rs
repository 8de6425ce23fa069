//! Data models for demo seeding.

use edurapor_models::{AcademicYearId, ClassId, ProgramId, StudentId, SubjectId, TeacherId};

/// Controls the size and completeness of the generated demo school.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    /// Start year of the seeded academic year; GANJIL of it becomes active.
    pub tahun_mulai: i32,
    pub classes_per_program: usize,
    pub students_per_class: usize,
    /// Share of students (0.0 - 1.0) left with a missing UAS and final score.
    pub incomplete_ratio: f64,
}

impl SeedConfig {
    pub fn new(tahun_mulai: i32) -> Self {
        Self {
            tahun_mulai,
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, classes_per_program: usize) -> Self {
        self.classes_per_program = classes_per_program;
        self
    }

    pub fn with_students(mut self, students_per_class: usize) -> Self {
        self.students_per_class = students_per_class;
        self
    }

    pub fn with_incomplete_ratio(mut self, ratio: f64) -> Self {
        self.incomplete_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            tahun_mulai: 2024,
            classes_per_program: 2,
            students_per_class: 20,
            incomplete_ratio: 0.1,
        }
    }
}

/// Academic years created for a demo run.
#[derive(Clone, Copy, Debug)]
pub struct DemoYears {
    pub ganjil: AcademicYearId,
    pub genap: AcademicYearId,
    pub next_ganjil: AcademicYearId,
}

pub struct TeacherSeed {
    pub name: String,
    pub email: String,
}

pub struct ClassSeed {
    pub nama_kelas: String,
    pub academic_year_id: AcademicYearId,
    pub program_id: ProgramId,
    pub homeroom_teacher_id: Option<TeacherId>,
}

pub struct StudentSeed {
    pub nama_lengkap: String,
    pub nisn: String,
    pub class_id: ClassId,
}

pub struct ScoreSeed {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub kind: &'static str,
    pub value: f64,
}

pub struct FinalScoreSeed {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub value: f64,
}

pub struct BehaviorSeed {
    pub student_id: StudentId,
    pub sikap: &'static str,
    pub hadir: i32,
    pub sakit: i32,
    pub izin: i32,
    pub alpa: i32,
}

/// Every record generated for one student in one semester.
#[derive(Default)]
pub struct StudentRecords {
    pub scores: Vec<ScoreSeed>,
    pub final_scores: Vec<FinalScoreSeed>,
    pub behavior: Option<BehaviorSeed>,
}

#[derive(Default)]
pub struct RecordBatch {
    pub scores: Vec<ScoreSeed>,
    pub final_scores: Vec<FinalScoreSeed>,
    pub behavior: Vec<BehaviorSeed>,
}

impl RecordBatch {
    pub fn push(&mut self, records: StudentRecords) {
        self.scores.extend(records.scores);
        self.final_scores.extend(records.final_scores);
        self.behavior.extend(records.behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_ratio_is_clamped() {
        assert_eq!(SeedConfig::new(2024).with_incomplete_ratio(1.5).incomplete_ratio, 1.0);
        assert_eq!(SeedConfig::new(2024).with_incomplete_ratio(-0.2).incomplete_ratio, 0.0);
    }

    #[test]
    fn test_record_batch_collects_behavior() {
        let student_id = StudentId::new();
        let mut batch = RecordBatch::default();
        batch.push(StudentRecords {
            behavior: Some(BehaviorSeed {
                student_id,
                sikap: "B",
                hadir: 100,
                sakit: 0,
                izin: 0,
                alpa: 0,
            }),
            ..Default::default()
        });
        batch.push(StudentRecords::default());

        assert_eq!(batch.behavior.len(), 1);
        assert!(batch.scores.is_empty());
    }
}
